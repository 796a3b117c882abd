use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};

/// Longest accepted remembered-session lifetime, in days.
pub const MAX_SESSION_DURATION_DAYS: i64 = 3650;
/// Longest accepted browser-session lifetime, in hours.
pub const MAX_BROWSER_SESSION_HOURS: i64 = 24 * 365;

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The URL of the PostgreSQL database. Users are kept in memory when unset.
    pub database_url: Option<String>,
    /// The URL of the Redis server. Sessions are kept in memory when unset.
    pub redis_url: Option<String>,
    /// Lifetime of a remembered session in days.
    pub session_duration_days: i64,
    /// Lifetime of a browser-session (not remembered) session in hours.
    pub browser_session_hours: i64,
    /// How long a notice stays on screen, in milliseconds.
    pub toastr_timeout_ms: u64,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Directory served under `/static`.
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database_url: None,
            redis_url: None,
            session_duration_days: 30,
            browser_session_hours: 12,
            toastr_timeout_ms: 2000,
            secure_cookies: false,
            static_dir: "static".to_string(),
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let is_production = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string()) == "production";

        let session_duration_days: i64 = env::var("SESSION_DURATION_DAYS")
            .unwrap_or_else(|_| defaults.session_duration_days.to_string())
            .parse()
            .context("Invalid SESSION_DURATION_DAYS")?;

        let browser_session_hours: i64 = env::var("BROWSER_SESSION_HOURS")
            .unwrap_or_else(|_| defaults.browser_session_hours.to_string())
            .parse()
            .context("Invalid BROWSER_SESSION_HOURS")?;

        check_session_lifetimes(session_duration_days, browser_session_hours)?;

        Ok(Self {
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| defaults.bind_addr.to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            session_duration_days,
            browser_session_hours,
            toastr_timeout_ms: env::var("TOASTR_TIMEOUT")
                .unwrap_or_else(|_| defaults.toastr_timeout_ms.to_string())
                .parse()
                .context("Invalid TOASTR_TIMEOUT")?,
            secure_cookies: is_production,
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
        })
    }
}

/// Rejects session lifetimes outside `1..=MAX_*`.
fn check_session_lifetimes(session_duration_days: i64, browser_session_hours: i64) -> Result<()> {
    if !(1..=MAX_SESSION_DURATION_DAYS).contains(&session_duration_days) {
        anyhow::bail!(
            "SESSION_DURATION_DAYS must be between 1 and {}",
            MAX_SESSION_DURATION_DAYS
        );
    }
    if !(1..=MAX_BROWSER_SESSION_HOURS).contains(&browser_session_hours) {
        anyhow::bail!(
            "BROWSER_SESSION_HOURS must be between 1 and {}",
            MAX_BROWSER_SESSION_HOURS
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_accepted() {
        let defaults = Config::default();

        assert!(
            check_session_lifetimes(defaults.session_duration_days, defaults.browser_session_hours)
                .is_ok()
        );
        assert!(check_session_lifetimes(MAX_SESSION_DURATION_DAYS, MAX_BROWSER_SESSION_HOURS).is_ok());
    }

    #[test]
    fn rejects_non_positive_lifetimes() {
        assert!(check_session_lifetimes(0, 12).is_err());
        assert!(check_session_lifetimes(30, 0).is_err());
        assert!(check_session_lifetimes(-1, -1).is_err());
    }

    #[test]
    fn rejects_lifetimes_that_overflow_timestamps() {
        assert!(check_session_lifetimes(200_000_000, 12).is_err());
        assert!(check_session_lifetimes(MAX_SESSION_DURATION_DAYS + 1, 12).is_err());
        assert!(check_session_lifetimes(30, i64::MAX).is_err());
    }
}
