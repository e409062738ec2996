//! Unit tests for the cleanup service

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use tp_shared::CleanupConfig;

use crate::domain::entities::token::NewRefreshRecord;
use crate::repositories::{InMemoryTokenRepository, TokenRepository};
use crate::services::token::TokenCleanupService;

use super::mocks::FlakyTokenRepository;

async fn seed(repo: &InMemoryTokenRepository, issued_ago: Duration, lifetime: Duration) -> Uuid {
    let record = NewRefreshRecord::new(
        Uuid::new_v4(),
        "hash".to_string(),
        Utc::now() - issued_ago,
        lifetime,
    );
    repo.save_refresh_token(record).await.unwrap()
}

#[tokio::test]
async fn test_run_cleanup_removes_unredeemable_records() {
    let repo = Arc::new(InMemoryTokenRepository::new());
    let live = seed(&repo, Duration::zero(), Duration::hours(1)).await;
    seed(&repo, Duration::hours(2), Duration::hours(1)).await;
    let consumed = seed(&repo, Duration::zero(), Duration::hours(1)).await;
    repo.take_refresh_token(consumed, Utc::now()).await.unwrap();

    let service = TokenCleanupService::new(repo.clone(), CleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 2);
    assert!(repo.get(live).await.is_some());
}

#[tokio::test]
async fn test_disabled_cleanup_is_a_no_op() {
    let repo = Arc::new(InMemoryTokenRepository::new());
    seed(&repo, Duration::hours(2), Duration::hours(1)).await;

    let config = CleanupConfig {
        enabled: false,
        ..Default::default()
    };
    let service = Arc::new(TokenCleanupService::new(repo.clone(), config));

    assert_eq!(service.run_cleanup().await.unwrap().expired_tokens_deleted, 0);
    assert!(service.clone().start_background_task().is_none());
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_cleanup_collects_store_errors() {
    let repo = Arc::new(FlakyTokenRepository::new());
    FlakyTokenRepository::set(&repo.fail_delete_expired, true);

    let service = TokenCleanupService::new(repo, CleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn test_cleanup_works_through_trait_object() {
    let inner = InMemoryTokenRepository::new();
    seed(&inner, Duration::hours(2), Duration::hours(1)).await;
    let repo: Arc<dyn TokenRepository> = Arc::new(inner.clone());

    let service = TokenCleanupService::new(repo, CleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert_eq!(result.expired_tokens_deleted, 1);
    assert!(inner.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let repo = Arc::new(InMemoryTokenRepository::new());
    seed(&repo, Duration::hours(2), Duration::hours(1)).await;

    let config = CleanupConfig {
        interval_seconds: 60,
        enabled: true,
    };
    let service = Arc::new(TokenCleanupService::new(repo.clone(), config));
    let handle = service.start_background_task().unwrap();

    // First tick fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert!(repo.is_empty().await);

    handle.abort();
}
