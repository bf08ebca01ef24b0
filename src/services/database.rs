//! MySQL connection pool shared by every handler.
//!
//! The pool is built lazily: constructing it never touches the network, so
//! the server can start even when the database is down. Connectivity is
//! checked explicitly with [`Database::probe`].

use crate::config::DatabaseConfig;
use sqlx::{
    MySqlPool,
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("unexpected probe result: {0}")]
    UnexpectedProbeResult(i64),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: Arc<MySqlPool>,
}

impl Database {
    /// Build the pool from `cfg` without opening any connection.
    pub fn connect_lazy(cfg: &DatabaseConfig) -> Self {
        let mut options = MySqlConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .username(&cfg.user);
        if let Some(password) = cfg.password.as_deref() {
            options = options.password(password);
        }
        if let Some(name) = cfg.name.as_deref() {
            options = options.database(name);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout)
            .connect_lazy_with(options);

        debug!(
            "MySQL pool for {}@{}:{} (max {} connections)",
            cfg.user, cfg.host, cfg.port, cfg.max_connections
        );
        info!("Configuração da Base de Dados carregada.");

        Self {
            pool: Arc::new(pool),
        }
    }

    /// One-shot connectivity check: `SELECT 1` must come back as 1.
    pub async fn probe(&self) -> DatabaseResult<()> {
        let value = sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.pool)
            .await?;
        if value != 1 {
            return Err(DatabaseError::UnexpectedProbeResult(value));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    /// A pool pointed at a port nothing listens on.
    pub(crate) fn unreachable_database() -> Database {
        let cfg = DatabaseConfig {
            host: "127.0.0.1".into(),
            port: 1,
            acquire_timeout: Duration::from_millis(300),
            ..DatabaseConfig::default()
        };
        Database::connect_lazy(&cfg)
    }

    #[tokio::test]
    async fn connect_lazy_opens_no_connections() {
        let db = unreachable_database();
        assert_eq!(db.pool.size(), 0);
    }

    #[tokio::test]
    async fn probe_fails_when_database_is_unreachable() {
        let db = unreachable_database();
        let err = db.probe().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlx(_)));
    }
}
