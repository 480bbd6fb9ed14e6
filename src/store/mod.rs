//! Storage capability for users, sessions, and the application allowlist.
//!
//! The gateway core never talks to a database directly; every handler receives
//! an `Arc<dyn AuthStore>` at construction. Production wires the Postgres
//! implementation, tests substitute the in-memory one.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A stored user, including the password digest.
///
/// Only the store and the login path ever see this shape; everything that
/// leaves the gateway goes through the sanitized identity view instead.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<String>,
}

/// Fields required to create an account. The password arrives pre-hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Outcome when attempting to create a new user.
#[derive(Debug, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created,
    DuplicateEmail,
}

/// A session joined with its owning user.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: String,
    pub user: UserRecord,
    pub created_at: DateTime<Utc>,
}

/// A registered application domain trusted to receive handoff tokens.
#[derive(Debug, Clone)]
pub struct RegisteredApp {
    pub domain: String,
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Insert a new user. Relies on the store's uniqueness constraint to close
    /// the check-then-insert race on email.
    async fn create_user(&self, user: NewUser) -> Result<CreateUserOutcome>;

    /// Persist a session. A session-id collision violates the store's primary
    /// key and surfaces as an error; with 128 bits of entropy that is treated
    /// as fatal, never retried.
    async fn create_session(&self, id: &str, user_id: Uuid) -> Result<()>;

    async fn find_session(&self, id: &str) -> Result<Option<SessionRecord>>;

    /// Delete a session. Idempotent; deleting an absent id is not an error.
    async fn delete_session(&self, id: &str) -> Result<()>;

    /// Exact-match lookup against the registered-application allowlist.
    async fn find_app_by_domain(&self, domain: &str) -> Result<Option<RegisteredApp>>;
}
