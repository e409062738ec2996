//! MySQL pool construction for the credential store

use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use tracing::{error, info};

use tp_shared::DatabaseConfig;

use crate::InfrastructureError;

/// Owns the sqlx pool that backs `MySqlTokenRepository`
///
/// Built once at startup from `DatabaseConfig` and closed when the server
/// stops, so in-flight statements finish before the process exits.
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Connect with the limits and timeouts from `config`
    ///
    /// An unparsable URL is a `Config` error and never touches the network.
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let connect_options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

        info!(
            max_connections = config.max_connections,
            connect_timeout = config.connect_timeout,
            "Connecting to credential store"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to connect to credential store");
                InfrastructureError::Database(e)
            })?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Wait for checked-out connections to return, then close them all
    pub async fn close(&self) {
        info!(open = self.pool.size(), "Closing credential store pool");
        self.pool.close().await;
    }
}
