//! In-memory store, used by tests and local experiments.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    AuthStore, CreateUserOutcome, NewUser, RegisteredApp, SessionRecord, UserRecord,
};

#[derive(Default)]
struct Inner {
    users: Vec<UserRecord>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    apps: HashSet<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registered application domain.
    pub async fn add_app(&self, domain: &str) {
        self.inner.lock().await.apps.insert(domain.to_string());
    }

    pub async fn session_count(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|user| user.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<CreateUserOutcome> {
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|existing| existing.email == user.email) {
            return Ok(CreateUserOutcome::DuplicateEmail);
        }
        inner.users.push(UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            roles: Vec::new(),
        });
        Ok(CreateUserOutcome::Created)
    }

    async fn create_session(&self, id: &str, user_id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.sessions.contains_key(id) {
            return Err(anyhow!("session id collision"));
        }
        inner
            .sessions
            .insert(id.to_string(), (user_id, Utc::now()));
        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<SessionRecord>> {
        let inner = self.inner.lock().await;
        let Some((user_id, created_at)) = inner.sessions.get(id) else {
            return Ok(None);
        };
        let Some(user) = inner.users.iter().find(|user| user.id == *user_id) else {
            return Ok(None);
        };
        Ok(Some(SessionRecord {
            id: id.to_string(),
            user: user.clone(),
            created_at: *created_at,
        }))
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        self.inner.lock().await.sessions.remove(id);
        Ok(())
    }

    async fn find_app_by_domain(&self, domain: &str) -> Result<Option<RegisteredApp>> {
        let inner = self.inner.lock().await;
        Ok(inner.apps.get(domain).map(|domain| RegisteredApp {
            domain: domain.clone(),
        }))
    }
}
