//! Self-identity endpoint backing the handoff-token exchange.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::error::AuthError;
use super::session::resolve_session;
use super::types::{IdentityView, MessageResponse};
use crate::store::AuthStore;

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Sanitized identity of the session owner", body = IdentityView),
        (status = 401, description = "Missing or unresolvable session", body = MessageResponse),
        (status = 500, description = "Unexpected failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn me(headers: HeaderMap, store: Extension<Arc<dyn AuthStore>>) -> impl IntoResponse {
    match identity(&**store, &headers).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn identity(store: &dyn AuthStore, headers: &HeaderMap) -> Result<IdentityView, AuthError> {
    if super::session::extract_session_id(headers).is_none() {
        return Err(AuthError::Unauthorized("No session cookie!"));
    }
    let record = resolve_session(store, headers)
        .await
        .map_err(AuthError::Internal)?;
    record
        .map(|record| IdentityView::from(record.user))
        .ok_or(AuthError::Unauthorized("Session doesnt exist!"))
}
