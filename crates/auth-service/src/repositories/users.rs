//! User repository.
//!
//! [`UserStore`] is the identity-lookup seam the request authenticator and
//! the signup/login flows depend on. `PgUserStore` backs it with Postgres;
//! `InMemoryUserStore` keeps users in process memory for local runs and
//! tests.

use crate::errors::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::fmt;
use tokio::sync::RwLock;

/// User model (maps to users table)
#[derive(Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Canonical username tokens are bound to.
    pub fn username(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields supplied when creating a user. Timestamps and id are assigned by
/// the store.
#[derive(Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Storage operations on users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email (exact match).
    async fn lookup_identity(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Insert a user.
    ///
    /// Fails with `AuthError::EmailAlreadyRegistered` when the email is taken.
    async fn save(&self, user: NewUser) -> Result<User, AuthError>;

    /// Every user, ordered by id.
    async fn list_all(&self) -> Result<Vec<User>, AuthError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn lookup_identity(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to fetch user by email: {}", e)))?;

        Ok(user)
    }

    async fn save(&self, user: NewUser) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, full_name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => AuthError::EmailAlreadyRegistered,
            _ => AuthError::Database(format!("Failed to create user: {}", e)),
        })?;

        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to list users: {}", e)))?;

        Ok(users)
    }
}

/// Process-local store. Ids start at 1 and increase by one per save.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn lookup_identity(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn save(&self, user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let id = users
            .last()
            .map_or(Ok(1), |last| last.id.checked_add(1).ok_or(AuthError::Internal))?;
        let now = Utc::now();
        let created = User {
            id,
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };

        users.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.read().await.clone())
    }
}

/// Test doubles for the user store.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose every operation fails with a database error.
    #[derive(Default)]
    pub struct FailingUserStore {
        calls: AtomicUsize,
    }

    impl FailingUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of operations attempted.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn fail<T>(&self) -> Result<T, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::Database("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl UserStore for FailingUserStore {
        async fn lookup_identity(&self, _email: &str) -> Result<Option<User>, AuthError> {
            self.fail()
        }

        async fn save(&self, _user: NewUser) -> Result<User, AuthError> {
            self.fail()
        }

        async fn list_all(&self) -> Result<Vec<User>, AuthError> {
            self.fail()
        }
    }
}
