use chrono::Duration;
use std::sync::Arc;

use crate::{
    config::Config,
    crypto::token,
    error::Result,
    models::session::Session,
    repositories::session::SessionStore,
};

/// Issues, resolves and destroys browser sessions on top of a [`SessionStore`].
///
/// A token is either unknown to the store (anonymous) or bound to exactly one
/// user ID until it is destroyed or expires.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    remember_lifetime: Duration,
    browser_lifetime: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &Config) -> Self {
        Self {
            store,
            remember_lifetime: Duration::days(config.session_duration_days),
            browser_lifetime: Duration::hours(config.browser_session_hours),
        }
    }

    /// Lifetime applied to a session established with the given `remember` flag.
    pub fn lifetime(&self, remember: bool) -> Duration {
        if remember {
            self.remember_lifetime
        } else {
            self.browser_lifetime
        }
    }

    /// Binds a freshly generated token to `user_id` and returns the token.
    pub async fn establish(&self, user_id: i64, remember: bool) -> Result<String> {
        let token = token::generate_session_token();
        let session = Session::new(user_id, remember, self.lifetime(remember))?;

        self.store.insert(&token, &session).await?;
        tracing::info!(user_id, remember, "✅ Session established");
        Ok(token)
    }

    /// Returns the user bound to `token`, or `None` for unknown, malformed
    /// or expired tokens.
    pub async fn resolve(&self, token: &str) -> Result<Option<i64>> {
        if !token::is_well_formed(token) {
            tracing::debug!("Malformed session token ignored");
            return Ok(None);
        }

        let Some(session) = self.store.get(token).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            tracing::debug!(user_id = session.user_id, "Session expired");
            self.store.remove(token).await?;
            return Ok(None);
        }

        Ok(Some(session.user_id))
    }

    /// Invalidates `token` immediately.
    pub async fn destroy(&self, token: &str) -> Result<()> {
        self.store.remove(token).await?;
        tracing::info!("✅ Session destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::session::MemorySessionStore;
    use chrono::Utc;

    fn manager() -> (Arc<MemorySessionStore>, SessionManager) {
        let store = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(store.clone(), &Config::default());
        (store, manager)
    }

    #[tokio::test]
    async fn establish_resolve_destroy() {
        let (_, sessions) = manager();

        let token = sessions.establish(42, true).await.unwrap();
        assert_eq!(sessions.resolve(&token).await.unwrap(), Some(42));
        assert_eq!(sessions.resolve(&token).await.unwrap(), Some(42));

        sessions.destroy(&token).await.unwrap();
        assert_eq!(sessions.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn tokens_are_independent() {
        let (_, sessions) = manager();

        let a = sessions.establish(1, false).await.unwrap();
        let b = sessions.establish(2, false).await.unwrap();
        assert_ne!(a, b);

        sessions.destroy(&a).await.unwrap();
        assert_eq!(sessions.resolve(&a).await.unwrap(), None);
        assert_eq!(sessions.resolve(&b).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn unknown_and_malformed_tokens_resolve_to_none() {
        let (_, sessions) = manager();

        assert_eq!(sessions.resolve("").await.unwrap(), None);
        assert_eq!(sessions.resolve("garbage").await.unwrap(), None);
        assert_eq!(
            sessions.resolve(&token::generate_session_token()).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn expired_session_resolves_to_none_and_is_removed() {
        let (store, sessions) = manager();
        let token = token::generate_session_token();
        let mut session = Session::new(9, true, Duration::hours(1)).unwrap();
        session.expires_at = Utc::now() - Duration::seconds(1);
        store.insert(&token, &session).await.unwrap();

        assert_eq!(sessions.resolve(&token).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn overflowing_lifetime_is_an_error_not_a_panic() {
        let store = Arc::new(MemorySessionStore::new());
        let config = Config {
            session_duration_days: 200_000_000,
            ..Config::default()
        };
        let sessions = SessionManager::new(store.clone(), &config);

        let err = sessions.establish(1, true).await.unwrap_err();

        assert!(matches!(err, crate::error::AppError::Internal(_)));
        assert!(store.is_empty().await);
        assert!(sessions.establish(1, false).await.is_ok());
    }

    #[test]
    fn remember_outlives_browser_session() {
        let (_, sessions) = manager();

        assert_eq!(sessions.lifetime(true), Duration::days(30));
        assert_eq!(sessions.lifetime(false), Duration::hours(12));
    }
}
