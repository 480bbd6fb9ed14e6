//! End-to-end handler tests against the in-memory store.

use axum::{
    extract::{Extension, Query},
    http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::logout::{logout, LogoutParams};
use super::me::me;
use super::register::register;
use super::sso::{login_page, BrokerParams};
use super::state::AuthConfig;
use super::types::{LoginRequest, RegisterRequest};
use super::{login::login, session::SESSION_COOKIE_NAME};
use crate::store::{AuthStore, MemoryStore, NewUser};

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "correct horse battery";

struct TestGateway {
    memory: Arc<MemoryStore>,
    store: Arc<dyn AuthStore>,
    config: Arc<AuthConfig>,
}

impl TestGateway {
    async fn new() -> Self {
        let memory = Arc::new(MemoryStore::new());
        memory.add_app("app.example.com").await;
        // Low bcrypt cost keeps fixtures fast; verify honors the embedded cost.
        memory
            .create_user(NewUser {
                email: EMAIL.to_string(),
                password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
                first_name: Some("Ada".to_string()),
                last_name: Some("Lovelace".to_string()),
            })
            .await
            .unwrap();

        let store: Arc<dyn AuthStore> = memory.clone();
        Self {
            memory,
            store,
            config: Arc::new(AuthConfig::new(false)),
        }
    }

    async fn login(&self, email: &str, password: &str) -> Response {
        login(
            Extension(self.store.clone()),
            Extension(self.config.clone()),
            Some(Json(LoginRequest {
                email: email.to_string(),
                password: password.to_string().into(),
            })),
        )
        .await
        .into_response()
    }

    /// Log in with the fixture credentials and return the minted session id.
    async fn session_id(&self) -> String {
        let response = self.login(EMAIL, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("login must set the session cookie")
            .to_str()
            .unwrap();
        let (name_value, _) = cookie.split_once(';').unwrap();
        let (name, value) = name_value.split_once('=').unwrap();
        assert_eq!(name, SESSION_COOKIE_NAME);
        value.to_string()
    }

    async fn broker(&self, redirect: Option<&str>, session_id: Option<&str>) -> Response {
        login_page(
            cookie_headers(session_id),
            Query(BrokerParams {
                redirect: redirect.map(str::to_string),
            }),
            Extension(self.store.clone()),
        )
        .await
        .into_response()
    }

    async fn logout(&self, redirect: Option<&str>, session_id: Option<&str>) -> Response {
        logout(
            cookie_headers(session_id),
            Query(LogoutParams {
                redirect: redirect.map(str::to_string),
            }),
            Extension(self.store.clone()),
            Extension(self.config.clone()),
        )
        .await
        .into_response()
    }

    async fn me(&self, session_id: Option<&str>) -> Response {
        me(cookie_headers(session_id), Extension(self.store.clone()))
            .await
            .into_response()
    }
}

fn cookie_headers(session_id: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(id) = session_id {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}={id}")).unwrap(),
        );
    }
    headers
}

async fn body_message(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    value["message"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn login_creates_exactly_one_session() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    assert_eq!(session_id.len(), 32);
    assert!(session_id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(gateway.memory.session_count().await, 1);
}

#[tokio::test]
async fn login_cookie_attributes() {
    let gateway = TestGateway::new().await;
    let response = gateway.login(EMAIL, PASSWORD).await;
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=3600"));
    // Not production: no Secure flag.
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let gateway = TestGateway::new().await;

    let unknown = gateway.login("nobody@example.com", PASSWORD).await;
    let wrong = gateway.login(EMAIL, "wrong password").await;

    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_message(unknown).await, body_message(wrong).await);
    // No failure path leaves a session behind.
    assert_eq!(gateway.memory.session_count().await, 0);
}

#[tokio::test]
async fn login_validation_happens_before_any_store_access() {
    let gateway = TestGateway::new().await;

    let response = gateway.login("not-an-email", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_message(response).await, "Invalid email");

    let response = gateway.login(EMAIL, "short").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_message(response).await,
        "Password must be at least 8 characters"
    );
    assert_eq!(gateway.memory.session_count().await, 0);
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let gateway = TestGateway::new().await;

    let response = register(
        Extension(gateway.store.clone()),
        Some(Json(RegisterRequest {
            email: "grace@example.com".to_string(),
            password: "enigma machine".to_string().into(),
            first_name: Some("Grace".to_string()),
            last_name: None,
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_message(response).await,
        "Successfully created an account"
    );
    // Registration leaves the account with zero sessions.
    assert_eq!(gateway.memory.session_count().await, 0);

    let response = gateway.login("grace@example.com", "enigma machine").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let gateway = TestGateway::new().await;

    let response = register(
        Extension(gateway.store.clone()),
        Some(Json(RegisterRequest {
            email: EMAIL.to_string(),
            password: "another password".to_string().into(),
            first_name: None,
            last_name: None,
        })),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_message(response).await, "Email already registered");
    assert_eq!(gateway.memory.user_count().await, 1);
}

#[tokio::test]
async fn me_resolves_the_authenticated_user() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    let response = gateway.me(Some(&session_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let identity: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(identity["email"], EMAIL);
    assert_eq!(identity["firstName"], "Ada");
    assert!(identity.get("passwordHash").is_none());
    assert!(identity.get("sessions").is_none());
}

#[tokio::test]
async fn me_without_cookie_is_unauthorized() {
    let gateway = TestGateway::new().await;
    let response = gateway.me(None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "No session cookie!");
}

#[tokio::test]
async fn me_with_unknown_session_is_unauthorized_never_a_fault() {
    let gateway = TestGateway::new().await;
    let response = gateway.me(Some("0123456789abcdef0123456789abcdef")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_message(response).await, "Session doesnt exist!");
}

#[tokio::test]
async fn broker_appends_token_preserving_existing_params() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    let response = gateway
        .broker(
            Some("https://app.example.com/path?x=1"),
            Some(&session_id),
        )
        .await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    let location = response
        .headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(
        location,
        format!("https://app.example.com/path?x=1&token={session_id}")
    );
}

#[tokio::test]
async fn broker_rejects_unregistered_domain() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    let response = gateway
        .broker(Some("https://evil.com/steal"), Some(&session_id))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_message(response).await, "Invalid redirect domain");
}

#[tokio::test]
async fn broker_rejects_lookalike_subdomain() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    // Exact match only; a subdomain of a registered app is not registered.
    let response = gateway
        .broker(Some("https://sub.app.example.com/"), Some(&session_id))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn broker_missing_redirect_is_an_error_even_without_session() {
    let gateway = TestGateway::new().await;

    let response = gateway.broker(None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_message(response).await, "Invalid redirect domain");

    let session_id = gateway.session_id().await;
    let response = gateway.broker(None, Some(&session_id)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn broker_renders_login_without_a_usable_session() {
    let gateway = TestGateway::new().await;

    // First-time visit: no cookie at all.
    let response = gateway
        .broker(Some("https://app.example.com/"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Forged or expired cookie falls through the same way, not an error.
    let response = gateway
        .broker(Some("https://app.example.com/"), Some("forged"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn broker_rejects_malformed_targets() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    for target in ["not a url", "/relative/path", "mailto:a@example.com"] {
        let response = gateway.broker(Some(target), Some(&session_id)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{target}");
        assert_eq!(body_message(response).await, "Invalid redirect domain!");
    }
}

#[tokio::test]
async fn handoff_token_resolves_to_the_authenticated_user() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    let response = gateway
        .broker(Some("https://app.example.com/cb"), Some(&session_id))
        .await;
    let location = response
        .headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    let url = url::Url::parse(location).unwrap();
    let token = url
        .query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.to_string())
        .unwrap();

    // The target app exchanges the token through the same resolution path.
    let record = gateway.store.find_session(&token).await.unwrap().unwrap();
    assert_eq!(record.user.email, EMAIL);
}

#[tokio::test]
async fn logout_clears_cookie_and_deletes_the_session() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;
    assert_eq!(gateway.memory.session_count().await, 1);

    let response = gateway
        .logout(Some("https://app.example.com/bye"), Some(&session_id))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(LOCATION).unwrap().to_str().unwrap(),
        "https://app.example.com/bye"
    );
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("session_id=;"));
    assert!(cookie.contains("Max-Age=0"));

    // The id no longer works as a handoff token.
    assert_eq!(gateway.memory.session_count().await, 0);
    let me = gateway.me(Some(&session_id)).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_is_idempotent_and_skips_the_allowlist() {
    let gateway = TestGateway::new().await;
    let session_id = gateway.session_id().await;

    // Destination is unregistered; logout bounces anyway.
    let first = gateway
        .logout(Some("https://anywhere.example.net/"), Some(&session_id))
        .await;
    let second = gateway
        .logout(Some("https://anywhere.example.net/"), Some(&session_id))
        .await;

    assert_eq!(first.status(), StatusCode::FOUND);
    assert_eq!(second.status(), StatusCode::FOUND);
    assert_eq!(
        first.headers().get(LOCATION),
        second.headers().get(LOCATION)
    );
    assert_eq!(
        first.headers().get(SET_COOKIE),
        second.headers().get(SET_COOKIE)
    );
}

#[tokio::test]
async fn logout_falls_back_to_the_configured_default() {
    let gateway = TestGateway::new().await;
    let response = gateway.logout(None, None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(LOCATION).unwrap().to_str().unwrap(),
        "https://rummage.cc"
    );
}
