//! Configuration for the token service

use chrono::Duration;
use tp_shared::config::auth::{DEFAULT_HASH_COST, DEFAULT_JWT_SECRET};
use tp_shared::TokenConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC secret for HS512 signing
    pub jwt_secret: String,
    /// `iss` claim
    pub issuer: String,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Refresh record lifetime
    pub refresh_token_lifetime: Duration,
    /// bcrypt work factor for refresh secrets
    pub hash_cost: u32,
    /// Accept an expired (but authentic) access token when refreshing
    pub refresh_allows_expired_access: bool,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            issuer: "tokenpair".to_string(),
            access_token_lifetime: Duration::hours(1),
            refresh_token_lifetime: Duration::hours(24),
            hash_cost: DEFAULT_HASH_COST,
            refresh_allows_expired_access: true,
        }
    }
}

impl From<&TokenConfig> for TokenServiceConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            access_token_lifetime: Duration::seconds(config.access_token_expiry),
            refresh_token_lifetime: Duration::seconds(config.refresh_token_expiry),
            hash_cost: config.hash_cost,
            refresh_allows_expired_access: config.refresh_allows_expired_access,
        }
    }
}
