//! Account creation.

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, Json,
};
use secrecy::ExposeSecret;
use std::sync::Arc;

use super::error::AuthError;
use super::types::{MessageResponse, RegisterRequest};
use super::utils::{hash_password, validate_credentials};
use crate::store::{AuthStore, CreateUserOutcome, NewUser};

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Validation error or duplicate email", body = MessageResponse),
        (status = 500, description = "Unexpected failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    store: Extension<Arc<dyn AuthStore>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return AuthError::Validation("Missing payload".to_string()).into_response();
        }
    };

    match create_account(&**store, request).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Successfully created an account")),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn create_account(store: &dyn AuthStore, request: RegisterRequest) -> Result<(), AuthError> {
    validate_credentials(&request.email, request.password.expose_secret())?;

    // Explicit existence check first; the store's uniqueness constraint is the
    // backstop for the window between this check and the insert.
    if store
        .find_user_by_email(&request.email)
        .await
        .map_err(AuthError::Internal)?
        .is_some()
    {
        return Err(AuthError::DuplicateEmail);
    }

    let password = request.password.expose_secret().to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AuthError::Internal(err.into()))?
        .map_err(AuthError::Internal)?;

    let outcome = store
        .create_user(NewUser {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await
        .map_err(AuthError::Internal)?;

    match outcome {
        CreateUserOutcome::Created => Ok(()),
        CreateUserOutcome::DuplicateEmail => Err(AuthError::DuplicateEmail),
    }
}
