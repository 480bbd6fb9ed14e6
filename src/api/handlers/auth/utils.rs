//! Validation, session-id generation, and the password-hashing capability.

use anyhow::{Context, Result};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use std::fmt::Write;

use super::error::AuthError;

/// bcrypt work factor for newly stored digests.
pub(super) const BCRYPT_COST: u32 = 10;

const MIN_EMAIL_LENGTH: usize = 5;
const MIN_PASSWORD_LENGTH: usize = 8;
const SESSION_ID_BYTES: usize = 16;

/// Basic email format check.
pub(super) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Shape validation shared by login and registration. Stops at the first
/// violated rule; no store access happens before this passes.
pub(super) fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if !valid_email(email) {
        return Err(AuthError::Validation("Invalid email".to_string()));
    }
    if email.len() < MIN_EMAIL_LENGTH {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

/// Mint a session identifier: 16 bytes from the OS CSPRNG, hex-encoded.
///
/// The 32-character lowercase hex form is a contract; downstream applications
/// store and replay the value verbatim as the handoff token.
pub(super) fn generate_session_id() -> Result<String> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session id")?;

    let mut id = String::with_capacity(SESSION_ID_BYTES * 2);
    for byte in bytes {
        write!(id, "{byte:02x}").context("failed to encode session id")?;
    }
    Ok(id)
}

/// Hash a plaintext password for storage. CPU-bound by design; callers run it
/// on the blocking pool.
pub(super) fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST).context("failed to hash password")
}

/// Verify a plaintext password against a stored digest. A malformed digest
/// counts as a mismatch rather than an error.
pub(super) fn verify_password(password: &str, digest: &str) -> bool {
    bcrypt::verify(password, digest).unwrap_or(false)
}
