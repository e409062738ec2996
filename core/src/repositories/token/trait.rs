//! Credential store contract for refresh record persistence.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{NewRefreshRecord, RefreshRecord};
use crate::errors::DomainError;

/// Repository trait for refresh record persistence
///
/// Implementations hold only the hash of each refresh secret. Failures are
/// reported as `DomainError::StoreFailure` so callers can tell a backend
/// outage apart from a bad credential.
///
/// # Expiry policy
/// Expiry is lazy: an expired record is treated as absent by
/// `take_refresh_token` (and removed on the spot), and `delete_expired_tokens`
/// reaps the rest periodically.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Insert a new refresh record
    ///
    /// # Returns
    /// * `Ok(Uuid)` - The id the store assigned to the record
    /// * `Err(DomainError)` - Insert failed
    async fn save_refresh_token(&self, record: NewRefreshRecord) -> Result<Uuid, DomainError>;

    /// Atomically claim a refresh record for redemption
    ///
    /// Of any number of concurrent calls for the same id, at most one returns
    /// the record. Claimed records stay unredeemable until they are deleted.
    ///
    /// # Returns
    /// * `Ok(Some(RefreshRecord))` - The record, now marked consumed
    /// * `Ok(None)` - Unknown, already consumed, or expired at `now`
    /// * `Err(DomainError)` - Store failure
    async fn take_refresh_token(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshRecord>, DomainError>;

    /// Physically remove a refresh record
    ///
    /// # Returns
    /// * `Ok(true)` - Record was deleted
    /// * `Ok(false)` - Record not found
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_refresh_token(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete records that are expired at `now` or were consumed but never purged
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Check that the backing store can be reached
    ///
    /// Stores without a remote backend are always reachable.
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[async_trait]
impl<R: TokenRepository + ?Sized> TokenRepository for Arc<R> {
    async fn save_refresh_token(&self, record: NewRefreshRecord) -> Result<Uuid, DomainError> {
        (**self).save_refresh_token(record).await
    }

    async fn take_refresh_token(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshRecord>, DomainError> {
        (**self).take_refresh_token(id, now).await
    }

    async fn delete_refresh_token(&self, id: Uuid) -> Result<bool, DomainError> {
        (**self).delete_refresh_token(id).await
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        (**self).delete_expired_tokens(now).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        (**self).ping().await
    }
}
