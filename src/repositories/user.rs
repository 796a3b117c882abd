use async_trait::async_trait;
use deadpool_postgres::Pool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio_postgres::{Row, error::SqlState};
use chrono::Utc;
use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// Persistent record of users and their password hashes.
///
/// `create` must be atomic with respect to the login: two concurrent creates
/// with the same login yield exactly one `User` and one
/// `AppError::DuplicateLogin`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Prepares the backing storage (table creation).
    async fn init(&self) -> Result<()>;

    /// Creates a new user. Fails with `AppError::DuplicateLogin` if the login exists.
    async fn create(&self, login: &str, password_hash: &str) -> Result<User>;

    /// Finds a user by login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
}

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        login: row.try_get("login").map_err(|_| AppError::MissingData("login".to_string()))?,
        password_hash: row.try_get("password_hash").map_err(|_| AppError::MissingData("password_hash".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// PostgreSQL-backed user store.
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn init(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id BIGSERIAL PRIMARY KEY,
                    login VARCHAR(31) NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
            )
            .await?;
        tracing::info!("✅ users table ready");
        Ok(())
    }

    async fn create(&self, login: &str, password_hash: &str) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (login, password_hash)
                VALUES ($1, $2)
                RETURNING id, login, password_hash, created_at
                "#,
                &[&login, &password_hash],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::DuplicateLogin(login.to_string())
                } else {
                    AppError::from(e)
                }
            })?;
        row_to_user(&row)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, login, password_hash, created_at
                FROM users
                WHERE login = $1
                "#,
                &[&login],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, login, password_hash, created_at
                FROM users
                WHERE id = $1
                "#,
                &[&id],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }
}

#[derive(Default)]
struct MemoryUsers {
    next_id: i64,
    by_id: HashMap<i64, User>,
    by_login: HashMap<String, i64>,
}

/// Process-local user store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<MemoryUsers>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, login: &str, password_hash: &str) -> Result<User> {
        // Check and insert under one write lock.
        let mut users = self.inner.write().await;
        if users.by_login.contains_key(login) {
            return Err(AppError::DuplicateLogin(login.to_string()));
        }

        users.next_id += 1;
        let user = User {
            id: users.next_id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.by_login.insert(user.login.clone(), user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let users = self.inner.read().await;
        Ok(users
            .by_login
            .get(login)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().await.by_id.get(&id).cloned())
    }
}
