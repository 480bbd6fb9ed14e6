//! Postgres-backed store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::{
    AuthStore, CreateUserOutcome, NewUser, RegisteredApp, SessionRecord, UserRecord,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        roles: row.get("roles"),
    }
}

#[async_trait]
impl AuthStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let query = r"
            SELECT id, email, password_hash, first_name, last_name, roles
            FROM users
            WHERE email = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by email")?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    async fn create_user(&self, user: NewUser) -> Result<CreateUserOutcome> {
        let query = r"
            INSERT INTO users (email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(CreateUserOutcome::Created),
            Err(err) if is_unique_violation(&err) => Ok(CreateUserOutcome::DuplicateEmail),
            Err(err) => Err(err).context("failed to insert user"),
        }
    }

    async fn create_session(&self, id: &str, user_id: Uuid) -> Result<()> {
        let query = "INSERT INTO sessions (id, user_id) VALUES ($1, $2)";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert session")?;
        Ok(())
    }

    async fn find_session(&self, id: &str) -> Result<Option<SessionRecord>> {
        let query = r"
            SELECT sessions.id AS session_id, sessions.created_at,
                   users.id, users.email, users.password_hash,
                   users.first_name, users.last_name, users.roles
            FROM sessions
            JOIN users ON users.id = sessions.user_id
            WHERE sessions.id = $1
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup session")?;

        Ok(row.map(|row| SessionRecord {
            id: row.get("session_id"),
            created_at: row.get("created_at"),
            user: user_from_row(&row),
        }))
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        // Logout is idempotent; it's fine if no rows are deleted.
        let query = "DELETE FROM sessions WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete session")?;
        Ok(())
    }

    async fn find_app_by_domain(&self, domain: &str) -> Result<Option<RegisteredApp>> {
        let query = "SELECT domain FROM registered_apps WHERE domain = $1 LIMIT 1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(domain)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup registered app")?;

        Ok(row.map(|row| RegisteredApp {
            domain: row.get("domain"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::is_unique_violation;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
