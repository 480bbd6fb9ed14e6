//! Domain error taxonomy, mapped to HTTP at the handler boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input; carries the first violated rule's message.
    #[error("{0}")]
    Validation(String),

    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    /// Missing `redirect` parameter or unregistered target domain.
    #[error("Invalid redirect domain")]
    InvalidRedirect,

    /// Malformed target URL, or any failure while building the redirect.
    #[error("Invalid redirect domain!")]
    InvalidRedirectTarget,

    /// Absent or unresolvable session on `/me`; carries the client message.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Unexpected store or runtime failure. The source is logged server-side;
    /// clients only ever see a generic message.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidCredentials
            | Self::DuplicateEmail
            | Self::InvalidRedirect
            | Self::InvalidRedirectTarget => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref source) = self {
            error!("Internal error: {source:?}");
        }
        let body = Json(json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}
