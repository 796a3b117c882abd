use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Represents an authenticated browser session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The ID of the user this session belongs to.
    pub user_id: i64,
    /// Whether the session outlives the browser session.
    pub remember: bool,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for `user_id` that expires after `lifetime`.
    ///
    /// Fails when the expiry is not representable.
    pub fn new(user_id: i64, remember: bool, lifetime: Duration) -> Result<Self> {
        let created_at = Utc::now();
        let expires_at = created_at.checked_add_signed(lifetime).ok_or_else(|| {
            AppError::Internal(format!("Session lifetime out of range: {}", lifetime))
        })?;

        Ok(Self {
            user_id,
            remember,
            created_at,
            expires_at,
        })
    }

    /// Whether the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Seconds left before expiry, at least one.
    pub fn ttl_seconds(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_live() {
        let session = Session::new(7, true, Duration::hours(1)).unwrap();

        assert!(!session.is_expired());
        assert!(session.ttl_seconds() > 3500);
    }

    #[test]
    fn past_expiry_is_expired() {
        let mut session = Session::new(7, false, Duration::hours(1)).unwrap();
        session.expires_at = Utc::now() - Duration::seconds(1);

        assert!(session.is_expired());
        assert_eq!(session.ttl_seconds(), 1);
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let err = Session::new(7, true, Duration::MAX).unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }
}
