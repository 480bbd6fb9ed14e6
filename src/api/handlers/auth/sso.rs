//! Redirect broker: propagates a gateway session across a domain boundary.
//!
//! `GET /login?redirect=URL` exists for exactly one purpose: redirect-mediated
//! SSO. A request without a `redirect` parameter is invalid usage and fails
//! hard, even when no session is present. A session-less (or unresolvable)
//! visit with a target is the normal first-time flow and renders the login
//! page instead.

use axum::{
    extract::{Extension, Query},
    http::{header::LOCATION, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use url::Url;

use super::error::AuthError;
use super::session::resolve_session;
use super::types::MessageResponse;
use crate::store::AuthStore;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Sign in</title></head>
  <body>
    <form method="post" action="/login">
      <label>Email <input type="email" name="email" required></label>
      <label>Password <input type="password" name="password" required></label>
      <button type="submit">Sign in</button>
    </form>
  </body>
</html>
"#;

#[derive(Deserialize)]
pub struct BrokerParams {
    pub redirect: Option<String>,
}

#[utoipa::path(
    get,
    path = "/login",
    params(
        ("redirect" = Option<String>, Query, description = "Absolute URL of the registered application to hand the session to")
    ),
    responses(
        (status = 200, description = "Login page rendered (no valid session)"),
        (status = 301, description = "Redirect to the target with the handoff token appended"),
        (status = 400, description = "Missing, malformed, or unregistered redirect target", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn login_page(
    headers: HeaderMap,
    Query(params): Query<BrokerParams>,
    store: Extension<Arc<dyn AuthStore>>,
) -> impl IntoResponse {
    // The target is required before anything else, session or not.
    let Some(target) = params.redirect else {
        return AuthError::InvalidRedirect.into_response();
    };

    // Expired or forged cookies must not break navigation; a store failure
    // during resolution degrades the same way and is only logged.
    let session = match resolve_session(&**store, &headers).await {
        Ok(session) => session,
        Err(err) => {
            error!("Failed to resolve session: {err}");
            None
        }
    };
    let Some(session) = session else {
        return Html(LOGIN_PAGE).into_response();
    };

    match broker_redirect(&**store, &target, &session.id).await {
        Ok(location) => match location.as_str().parse() {
            Ok(value) => {
                let mut headers = HeaderMap::new();
                headers.insert(LOCATION, value);
                (StatusCode::MOVED_PERMANENTLY, headers).into_response()
            }
            // Fail closed; never redirect on error.
            Err(_) => AuthError::InvalidRedirectTarget.into_response(),
        },
        Err(err) => err.into_response(),
    }
}

/// Validate the target against the allowlist and append the handoff token.
///
/// Existing query parameters on the target survive; `token` is appended, not
/// substituted.
pub(super) async fn broker_redirect(
    store: &dyn AuthStore,
    target: &str,
    session_id: &str,
) -> Result<Url, AuthError> {
    let mut url = Url::parse(target).map_err(|_| AuthError::InvalidRedirectTarget)?;
    let Some(domain) = url.host_str().map(str::to_string) else {
        return Err(AuthError::InvalidRedirectTarget);
    };

    // Allowlist gate: exact hostname match, and a store failure here must not
    // fall through to a redirect.
    let app = store
        .find_app_by_domain(&domain)
        .await
        .map_err(|_| AuthError::InvalidRedirectTarget)?;
    if app.is_none() {
        return Err(AuthError::InvalidRedirect);
    }

    url.query_pairs_mut().append_pair("token", session_id);
    Ok(url)
}
