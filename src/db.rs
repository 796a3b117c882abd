use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use tokio_postgres::NoTls;
use crate::error::{AppError, Result};
use std::time::Duration;

/// Upper bound on pooled connections. One table, short queries.
const POOL_MAX_SIZE: usize = 16;

/// Creates the PostgreSQL pool backing the user store.
///
/// The URL is parsed up front so a malformed `DATABASE_URL` fails at startup
/// rather than on the first login.
pub fn create_pool(database_url: &str) -> Result<Pool> {
    database_url.parse::<tokio_postgres::Config>()?;

    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig {
        max_size: POOL_MAX_SIZE,
        timeouts: Timeouts {
            wait: Some(Duration::from_secs(5)),
            create: Some(Duration::from_secs(2)),
            recycle: Some(Duration::from_secs(1)),
        },
        ..PoolConfig::default()
    });

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(AppError::from)?;
    tracing::debug!("PostgreSQL pool created (max {} connections)", POOL_MAX_SIZE);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        assert!(matches!(create_pool("not a url ::"), Err(AppError::Database(_))));
    }
}
