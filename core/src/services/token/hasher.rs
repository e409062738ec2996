//! bcrypt hashing of refresh secrets

use crate::errors::DomainError;

/// Salted slow hash for refresh secrets
///
/// bcrypt reads at most 72 bytes of input, so the fixed-size refresh secret
/// is hashed whole.
#[derive(Debug, Clone, Copy)]
pub struct SecretHasher {
    cost: u32,
}

impl SecretHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, secret: &[u8]) -> Result<String, DomainError> {
        bcrypt::hash(secret, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash refresh secret: {}", e),
        })
    }

    /// `Ok(false)` on mismatch; errors only for a hash bcrypt cannot parse
    pub fn verify(&self, secret: &[u8], hash: &str) -> Result<bool, DomainError> {
        bcrypt::verify(secret, hash).map_err(|e| DomainError::Internal {
            message: format!("Stored refresh hash is unreadable: {}", e),
        })
    }

    /// Runs `hash` on the blocking pool so request tasks never stall on it
    pub async fn hash_blocking(&self, secret: Vec<u8>) -> Result<String, DomainError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Hashing task failed: {}", e),
            })?
    }

    pub async fn verify_blocking(&self, secret: Vec<u8>, hash: String) -> Result<bool, DomainError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Hash verification task failed: {}", e),
            })?
    }
}
