//! Session cookie handling and the shared resolution capability.

use anyhow::Result;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

use super::state::AuthConfig;
use crate::store::{AuthStore, SessionRecord};

pub(super) const SESSION_COOKIE_NAME: &str = "session_id";

/// Resolve the request's session cookie into a session record, if any.
///
/// This is the single resolution capability shared by `/me` and the redirect
/// broker. Returns `Ok(None)` when the cookie is missing or unknown; store
/// failures propagate so each caller can decide how to degrade.
pub(super) async fn resolve_session(
    store: &dyn AuthStore,
    headers: &HeaderMap,
) -> Result<Option<SessionRecord>> {
    let Some(session_id) = extract_session_id(headers) else {
        return Ok(None);
    };
    store.find_session(&session_id).await
}

/// Build the `HttpOnly` cookie carrying a freshly minted session id.
pub(super) fn session_cookie(
    config: &AuthConfig,
    session_id: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Expire the session cookie client-side.
pub(super) fn clear_session_cookie(
    config: &AuthConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}
