use redis::aio::ConnectionManager;
use std::sync::Arc;
use crate::config::Config;
use crate::error::Result;
use crate::repositories::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::repositories::user::{MemoryUserStore, PgUserStore, UserStore};
use crate::services::session::SessionManager;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The credential store.
    pub users: Arc<dyn UserStore>,
    /// The session manager.
    pub sessions: SessionManager,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`, connecting the configured backends.
    ///
    /// PostgreSQL and Redis are used when their URLs are configured; the
    /// in-memory stores are used otherwise. The `users` table is created
    /// if missing.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let users: Arc<dyn UserStore> = match &config.database_url {
            Some(database_url) => {
                let pool = crate::db::create_pool(database_url)?;
                tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");
                Arc::new(PgUserStore::new(pool))
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL not set, users are kept in memory");
                Arc::new(MemoryUserStore::new())
            }
        };
        users.init().await?;

        let session_store: Arc<dyn SessionStore> = match &config.redis_url {
            Some(redis_url) => {
                let redis_client = redis::Client::open(redis_url.as_str())?;
                let redis = ConnectionManager::new(redis_client).await?;
                tracing::info!("✅ Redis Connection Manager initialized (pooled)");
                Arc::new(RedisSessionStore::new(redis))
            }
            None => {
                tracing::warn!("⚠️ REDIS_URL not set, sessions are kept in memory");
                Arc::new(MemorySessionStore::new())
            }
        };

        Ok(Self::from_parts(config.clone(), users, session_store))
    }

    /// Assembles an `AppState` from already constructed stores.
    pub fn from_parts(
        config: Config,
        users: Arc<dyn UserStore>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        let sessions = SessionManager::new(session_store, &config);
        Self {
            users,
            sessions,
            config,
        }
    }

    /// Creates an `AppState` backed entirely by in-memory stores.
    pub fn in_memory(config: Config) -> Self {
        Self::from_parts(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemorySessionStore::new()),
        )
    }
}
