//! Gateway configuration.

const DEFAULT_SESSION_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_LOGOUT_REDIRECT: &str = "https://rummage.cc";

/// Runtime configuration for cookie construction and logout.
///
/// `production` is passed in explicitly; core logic never reads the process
/// environment to decide whether cookies are `Secure`.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    production: bool,
    session_ttl_seconds: i64,
    logout_redirect: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(production: bool) -> Self {
        Self {
            production,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            logout_redirect: DEFAULT_LOGOUT_REDIRECT.to_string(),
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_logout_redirect(mut self, url: String) -> Self {
        self.logout_redirect = url;
        self
    }

    pub(super) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    pub(super) fn logout_redirect(&self) -> &str {
        &self.logout_redirect
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.production
    }
}
