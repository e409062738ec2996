//! Token signing and lifetime configuration

use serde::{Deserialize, Serialize};

use super::{env_flag, env_or, env_value};

/// Default HMAC secret, only acceptable for local development
pub const DEFAULT_JWT_SECRET: &str = "secret";

/// bcrypt work factor used when none is configured (bcrypt's own default)
pub const DEFAULT_HASH_COST: u32 = 12;

/// Lowest and highest work factor bcrypt accepts
pub const MIN_HASH_COST: u32 = 4;
pub const MAX_HASH_COST: u32 = 31;

/// Configuration for access token signing and refresh token storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// HMAC secret used to sign access tokens
    #[serde(skip_serializing)]
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh record lifetime in seconds
    pub refresh_token_expiry: i64,

    /// `iss` claim written into and required from access tokens
    pub issuer: String,

    /// bcrypt cost for hashing refresh secrets
    pub hash_cost: u32,

    /// Whether a refresh may present an access token that is past its expiry
    pub refresh_allows_expired_access: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: 3600,   // 1 hour
            refresh_token_expiry: 86400, // 24 hours
            issuer: String::from("tokenpair"),
            hash_cost: DEFAULT_HASH_COST,
            refresh_allows_expired_access: true,
        }
    }
}

impl TokenConfig {
    /// Create a new token configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let secret = env_value("JWT_SIGNATURE")
            .or_else(|| env_value("JWT_SECRET"))
            .unwrap_or(defaults.secret);

        Ok(Self {
            secret,
            access_token_expiry: env_or("TOKEN_ACCESS_VALID_FOR", defaults.access_token_expiry)?,
            refresh_token_expiry: env_or("TOKEN_REFRESH_VALID_FOR", defaults.refresh_token_expiry)?,
            issuer: env_value("TOKEN_ISSUER").unwrap_or(defaults.issuer),
            hash_cost: env_or("TOKEN_HASH_COST", defaults.hash_cost)?,
            refresh_allows_expired_access: env_flag(
                "TOKEN_REFRESH_ALLOW_EXPIRED_ACCESS",
                defaults.refresh_allows_expired_access,
            )?,
        })
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in hours
    pub fn with_refresh_expiry_hours(mut self, hours: i64) -> Self {
        self.refresh_token_expiry = hours * 3600;
        self
    }

    /// Set the bcrypt cost
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }

    /// Check the values the engine relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("token secret must not be empty".to_string());
        }
        if self.access_token_expiry <= 0 {
            return Err(format!(
                "access token expiry must be positive, got {}",
                self.access_token_expiry
            ));
        }
        if self.refresh_token_expiry <= 0 {
            return Err(format!(
                "refresh token expiry must be positive, got {}",
                self.refresh_token_expiry
            ));
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.hash_cost) {
            return Err(format!(
                "hash cost must be within {}..={}, got {}",
                MIN_HASH_COST, MAX_HASH_COST, self.hash_cost
            ));
        }
        Ok(())
    }
}
