/**
 * User Model and Store
 *
 * The authenticator only needs to look users up by id; registration and
 * login also need lookup by email and creation. Two adapters implement the
 * `UserStore` port:
 *
 * - `PgUserStore` - PostgreSQL via sqlx (schema in `migrations/`)
 * - `InMemoryUserStore` - used when no database is configured, and in tests
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::backend::auth::identity::UserId;

/// User record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// bcrypt hash
    pub hashed_password: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields supplied at registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub hashed_password: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence port for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create a user. The first user ever created becomes an admin.
    ///
    /// # Errors
    ///
    /// `StoreError::DuplicateEmail` if the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
}

const USER_COLUMNS: &str =
    "id, email, hashed_password, full_name, is_active, is_admin, created_at, updated_at";

/// PostgreSQL-backed user store
#[derive(Debug, Clone)]
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
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        // SHARE ROW EXCLUSIVE conflicts with itself, so concurrent creates
        // queue here and each INSERT's snapshot sees every earlier commit.
        sqlx::query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, hashed_password, full_name, is_admin)
            VALUES ($1, $2, $3, NOT EXISTS (SELECT 1 FROM users))
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .bind(&new_user.full_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::DuplicateEmail(new_user.email.clone())
            }
            other => StoreError::Database(other),
        })?;

        tx.commit().await?;
        Ok(user)
    }
}

#[derive(Debug, Default)]
struct InMemoryUsers {
    users: HashMap<UserId, User>,
    next_id: UserId,
}

/// Process-local user store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<InMemoryUsers>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate or deactivate a user. Returns `false` if the user does not exist.
    pub async fn set_active(&self, id: UserId, active: bool) -> bool {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.is_active = active;
                user.updated_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|user| user.email == new_user.email) {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            email: new_user.email,
            hashed_password: new_user.hashed_password,
            full_name: new_user.full_name,
            is_active: true,
            is_admin: inner.users.is_empty(),
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            full_name: "Test".to_string(),
            hashed_password: "$2b$04$notarealhash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_user_is_admin() {
        let store = InMemoryUserStore::new();
        let first = store.create_user(new_user("first@example.com")).await.unwrap();
        let second = store.create_user(new_user("second@example.com")).await.unwrap();

        assert!(first.is_admin);
        assert!(!second.is_admin);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryUserStore::new();
        store.create_user(new_user("dup@example.com")).await.unwrap();

        let result = store.create_user(new_user("dup@example.com")).await;
        assert_matches!(result, Err(StoreError::DuplicateEmail(email)) if email == "dup@example.com");
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_email() {
        let store = InMemoryUserStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        let by_id = store.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");

        let by_email = store.get_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(store.get_user_by_id(user.id + 100).await.unwrap().is_none());
        assert!(store.get_user_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active() {
        let store = InMemoryUserStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        assert!(user.is_active);

        assert!(store.set_active(user.id, false).await);
        let user = store.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(!user.is_active);
        assert!(user.updated_at.is_some());

        assert!(!store.set_active(999, false).await);
    }
}
