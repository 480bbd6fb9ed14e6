//! # Enirejo (SSO Authentication Gateway)
//!
//! `enirejo` is a centralized authentication gateway. It verifies credentials,
//! issues opaque cookie-bound sessions, and brokers single sign-on by handing a
//! verified identity to registered third-party application domains.
//!
//! ## Session Handoff
//!
//! Sessions live on the gateway's own cookie domain. To propagate trust to a
//! different domain, `GET /login?redirect=URL` validates the caller's session,
//! checks the target hostname against the registered-application allowlist, and
//! emits a `301` whose `Location` carries the session identifier as a `token`
//! query parameter. The target application exchanges that token for an identity
//! through the same session-resolution capability behind `GET /me`.
//!
//! - **Allowlist gate:** a redirect target is honored only when its hostname
//!   exactly matches a registered application domain. Anything else is a hard
//!   `400`; the broker never degrades into an open redirect.
//! - **Session identifiers:** 16 bytes from the OS CSPRNG, hex-encoded to 32
//!   lowercase characters. Downstream applications store and replay this value
//!   verbatim, so the encoding is a contract.

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
