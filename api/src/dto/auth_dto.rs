use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tp_core::domain::entities::token::{Claims, TokenPair};

/// Query string of `POST /api/v1/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub access: String,
    pub refresh: String,
}

impl RefreshRequest {
    /// Both halves of the pair are present
    pub fn is_complete(&self) -> bool {
        !self.access.trim().is_empty() && !self.refresh.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access: pair.access,
            refresh: pair.refresh,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub status: String,
    pub subject: Uuid,
    pub refresh_id: Uuid,
    /// Unix timestamp (seconds) of the access token's expiry
    pub expires_at: i64,
}

impl From<Claims> for ValidateResponse {
    fn from(claims: Claims) -> Self {
        Self {
            status: "valid".to_string(),
            subject: claims.sub,
            refresh_id: claims.refresh_id,
            expires_at: claims.exp,
        }
    }
}
