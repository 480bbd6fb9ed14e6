//! Credential verification and session minting.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use secrecy::ExposeSecret;
use std::sync::Arc;

use super::error::AuthError;
use super::session::session_cookie;
use super::state::AuthConfig;
use super::types::{LoginRequest, MessageResponse};
use super::utils::{generate_session_id, validate_credentials, verify_password};
use crate::store::AuthStore;

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = MessageResponse),
        (status = 400, description = "Validation error or invalid credentials", body = MessageResponse),
        (status = 500, description = "Unexpected failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    store: Extension<Arc<dyn AuthStore>>,
    config: Extension<Arc<AuthConfig>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return AuthError::Validation("Missing payload".to_string()).into_response();
        }
    };

    match authenticate(&**store, &config, request).await {
        Ok(headers) => (
            StatusCode::OK,
            headers,
            Json(MessageResponse::new("Login successful")),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Verify the credentials and mint exactly one session on success. Every
/// failure path leaves zero sessions behind.
async fn authenticate(
    store: &dyn AuthStore,
    config: &AuthConfig,
    request: LoginRequest,
) -> Result<HeaderMap, AuthError> {
    validate_credentials(&request.email, request.password.expose_secret())?;

    let user = store
        .find_user_by_email(&request.email)
        .await
        .map_err(AuthError::Internal)?
        .ok_or(AuthError::InvalidCredentials)?;

    // bcrypt is deliberately slow; keep it off the async worker threads.
    let password = request.password.expose_secret().to_string();
    let digest = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &digest))
        .await
        .map_err(|err| AuthError::Internal(err.into()))?;
    if !matches {
        return Err(AuthError::InvalidCredentials);
    }

    let session_id = generate_session_id().map_err(AuthError::Internal)?;
    // An id collision violates the store's primary key and surfaces here as
    // an internal error; with 128 bits of entropy that is acceptable.
    store
        .create_session(&session_id, user.id)
        .await
        .map_err(AuthError::Internal)?;

    let cookie =
        session_cookie(config, &session_id).map_err(|err| AuthError::Internal(err.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}
