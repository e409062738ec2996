//! # Infrastructure Layer
//!
//! Durable backing for the token lifecycle engine:
//! - **Database**: MySQL connection pool, schema migration and the
//!   `TokenRepository` implementation, all on SQLx

pub mod database;

pub use database::{run_migrations, DatabasePool, MySqlTokenRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
