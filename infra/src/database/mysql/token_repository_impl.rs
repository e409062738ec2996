//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh records live in the `refresh_tokens` table. Redemption is a
//! conditional update of `consumed_at`, so InnoDB's row lock decides the
//! single winner among concurrent refreshes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::debug;
use uuid::Uuid;

use tp_core::domain::entities::token::{NewRefreshRecord, RefreshRecord};
use tp_core::errors::DomainError;
use tp_core::repositories::TokenRepository;

const SELECT_RECORD: &str = r#"
    SELECT id, user_id, secret_hash, issued_at, expires_at, consumed_at
    FROM refresh_tokens
    WHERE id = ?
"#;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Look at a record without claiming it
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshRecord>, DomainError> {
        let row = sqlx::query(SELECT_RECORD)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::store(format!("Failed to find refresh token: {}", e)))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    /// Convert database row to RefreshRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshRecord, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;

        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get user_id: {}", e) })?;

        Ok(RefreshRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid token UUID: {}", e) })?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid user UUID: {}", e) })?,
            secret_hash: row.try_get("secret_hash").map_err(|e| DomainError::Internal {
                message: format!("Failed to get secret_hash: {}", e),
            })?,
            issued_at: row.try_get::<DateTime<Utc>, _>("issued_at").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get issued_at: {}", e) }
            })?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get expires_at: {}", e) }
            })?,
            consumed_at: row.try_get::<Option<DateTime<Utc>>, _>("consumed_at").map_err(|e| {
                DomainError::Internal { message: format!("Failed to get consumed_at: {}", e) }
            })?,
        })
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save_refresh_token(&self, record: NewRefreshRecord) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();

        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, secret_hash, issued_at, expires_at, consumed_at
            ) VALUES (?, ?, ?, ?, ?, NULL)
        "#;

        sqlx::query(query)
            .bind(id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.secret_hash)
            .bind(record.issued_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store(format!("Failed to save refresh token: {}", e)))?;

        Ok(id)
    }

    async fn take_refresh_token(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshRecord>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::store(format!("Failed to begin transaction: {}", e)))?;

        let claimed = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET consumed_at = ?
            WHERE id = ? AND consumed_at IS NULL AND expires_at > ?
            "#,
        )
        .bind(now)
        .bind(id.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::store(format!("Failed to claim refresh token: {}", e)))?
        .rows_affected();

        if claimed == 0 {
            let reaped = sqlx::query("DELETE FROM refresh_tokens WHERE id = ? AND expires_at <= ?")
                .bind(id.to_string())
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::store(format!("Failed to reap refresh token: {}", e)))?
                .rows_affected();

            tx.commit()
                .await
                .map_err(|e| DomainError::store(format!("Failed to commit transaction: {}", e)))?;

            if reaped > 0 {
                debug!(refresh_id = %id, "Reaped expired refresh record on lookup");
            }
            return Ok(None);
        }

        let row = sqlx::query(SELECT_RECORD)
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::store(format!("Failed to read claimed token: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::store(format!("Failed to commit transaction: {}", e)))?;

        Self::row_to_record(&row).map(Some)
    }

    async fn delete_refresh_token(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store(format!("Failed to delete refresh token: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let query = r#"
            DELETE FROM refresh_tokens
            WHERE expires_at <= ? OR consumed_at IS NOT NULL
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store(format!("Failed to delete expired tokens: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::store(format!("Credential store unreachable: {}", e)))?;

        Ok(())
    }
}
