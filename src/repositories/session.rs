use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::{
    error::{AppError, Result},
    models::session::Session,
};

/// Server-side session table keyed by token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `session` under `token` until its expiry.
    async fn insert(&self, token: &str, session: &Session) -> Result<()>;

    /// Loads the session stored under `token`, if any.
    async fn get(&self, token: &str) -> Result<Option<Session>>;

    /// Removes the session stored under `token`. Removing an unknown token is a no-op.
    async fn remove(&self, token: &str) -> Result<()>;
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Redis-backed session store. Keys expire with the session.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, token: &str, session: &Session) -> Result<()> {
        let session_json = sonic_rs::to_string(session)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let mut redis = self.redis.clone();
        let _: () = redis
            .set_ex(session_key(token), &session_json, session.ttl_seconds())
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis set_ex failed: {}", e);
                AppError::Redis(e)
            })?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let mut redis = self.redis.clone();
        let session_json: Option<String> = redis.get(session_key(token)).await?;

        let Some(session_json) = session_json else {
            return Ok(None);
        };

        match sonic_rs::from_str::<Session>(&session_json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("❌ Invalid session JSON: {}", e);
                Ok(None)
            }
        }
    }

    async fn remove(&self, token: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(session_key(token)).await?;
        Ok(())
    }
}

/// Process-local session store. Sessions do not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, token: &str, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !existing.is_expired());
        sessions.insert(token.to_string(), session.clone());
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn insert_get_remove() {
        let store = MemorySessionStore::new();
        let session = Session::new(3, true, Duration::hours(1)).unwrap();

        store.insert("token-a", &session).await.unwrap();
        assert_eq!(store.get("token-a").await.unwrap().unwrap().user_id, 3);
        assert!(store.get("token-b").await.unwrap().is_none());

        store.remove("token-a").await.unwrap();
        assert!(store.get("token-a").await.unwrap().is_none());

        store.remove("token-a").await.unwrap();
    }

    #[tokio::test]
    async fn insert_purges_expired_sessions() {
        let store = MemorySessionStore::new();
        let mut stale = Session::new(1, false, Duration::hours(1)).unwrap();
        stale.expires_at = Utc::now() - Duration::seconds(5);

        store.insert("stale", &stale).await.unwrap();
        store
            .insert("fresh", &Session::new(2, false, Duration::hours(1)).unwrap())
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.get("stale").await.unwrap().is_none());
    }
}
