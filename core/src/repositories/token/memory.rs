//! In-memory implementation of TokenRepository
//!
//! Reference store and test double. Records live in a map guarded by a
//! single lock, which makes `take_refresh_token` trivially atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::token::{NewRefreshRecord, RefreshRecord};
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// In-process token repository, lost on restart
#[derive(Clone)]
pub struct InMemoryTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, RefreshRecord>>>,
}

impl InMemoryTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of records currently held, consumed ones included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    /// Look at a record without claiming it
    pub async fn get(&self, id: Uuid) -> Option<RefreshRecord> {
        self.tokens.read().await.get(&id).cloned()
    }
}

impl Default for InMemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save_refresh_token(&self, record: NewRefreshRecord) -> Result<Uuid, DomainError> {
        let mut tokens = self.tokens.write().await;

        let mut id = Uuid::new_v4();
        while tokens.contains_key(&id) {
            id = Uuid::new_v4();
        }

        tokens.insert(id, RefreshRecord::from_new(id, record));
        Ok(id)
    }

    async fn take_refresh_token(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshRecord>, DomainError> {
        let mut tokens = self.tokens.write().await;

        let expired = match tokens.get_mut(&id) {
            None => return Ok(None),
            Some(record) if record.is_consumed() => return Ok(None),
            Some(record) if !record.is_expired_at(now) => {
                record.consume(now);
                return Ok(Some(record.clone()));
            }
            Some(record) => record.id,
        };

        tokens.remove(&expired);
        debug!(refresh_id = %expired, "Reaped expired refresh record on lookup");
        Ok(None)
    }

    async fn delete_refresh_token(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(&id).is_some())
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, record| record.is_redeemable_at(now));

        Ok(initial_count - tokens.len())
    }
}
