//! Schema setup for the credential store

use sqlx::MySqlPool;
use tracing::info;

use crate::InfrastructureError;

/// Refresh record table, created if absent
pub const CREATE_REFRESH_TOKENS: &str =
    include_str!("../../migrations/20240101000000_create_refresh_tokens.sql");

/// Apply the schema. Safe to run on every startup.
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), InfrastructureError> {
    info!("Running database migrations");

    sqlx::query(CREATE_REFRESH_TOKENS).execute(pool).await?;

    info!("Database migrations completed");
    Ok(())
}
