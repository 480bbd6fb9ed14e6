//! Authentication and session-handoff handlers.
//!
//! The session lifecycle runs through four entry points: `POST /login` mints a
//! session and binds it to the `session_id` cookie, `GET /me` resolves the
//! cookie to a sanitized identity, `GET /login?redirect=URL` brokers the
//! cross-domain handoff, and `GET /logout` revokes the session.
//!
//! ## Enumeration resistance
//!
//! Unknown email and wrong password produce the same response. The broker's
//! rejection messages are equally uniform so callers cannot probe the
//! allowlist.

pub(crate) mod error;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod register;
pub(crate) mod session;
pub(crate) mod sso;
mod state;
pub(crate) mod types;
mod utils;

pub use state::AuthConfig;

#[cfg(test)]
mod tests;
