//! Token lifecycle engine: issue, rotate and validate access/refresh pairs

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{
    Claims, NewRefreshRecord, RefreshCredential, TokenPair, REFRESH_SECRET_LEN,
};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;
use super::hasher::SecretHasher;
use super::signer::TokenSigner;

/// Service for issuing, rotating and validating token pairs
///
/// Holds no mutable state of its own. Everything that changes lives in the
/// repository, so one instance can be shared across request handlers.
pub struct TokenService<R: TokenRepository> {
    pub(crate) repository: R,
    config: TokenServiceConfig,
    signer: TokenSigner,
    hasher: SecretHasher,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Credential store for refresh records
    /// * `config` - Token service configuration
    pub fn new(repository: R, config: TokenServiceConfig) -> Self {
        let signer = TokenSigner::new(config.jwt_secret.as_bytes(), &config.issuer);
        let hasher = SecretHasher::new(config.hash_cost);

        Self {
            repository,
            config,
            signer,
            hasher,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Issues a fresh token pair for `user_id`
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Access token plus refresh credential
    /// * `Err(DomainError::Unauthenticated)` - The refresh record could not be
    ///   stored; no credential is returned
    pub async fn issue_pair(&self, user_id: Uuid) -> DomainResult<TokenPair> {
        self.issue_pair_at(user_id, Utc::now()).await
    }

    /// [`issue_pair`](Self::issue_pair) against an explicit clock
    pub async fn issue_pair_at(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        self.mint_pair(user_id, now).await.map_err(|e| match e {
            DomainError::StoreFailure { .. } => DomainError::Unauthenticated,
            other => other,
        })
    }

    /// Hashes a fresh secret, stores the record and signs the access token.
    /// A failed insert is reported as `StoreFailure`; callers decide how to
    /// surface it.
    async fn mint_pair(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        let secret = generate_refresh_secret()?;
        let secret_hash = self.hasher.hash_blocking(secret.to_vec()).await?;

        let record =
            NewRefreshRecord::new(user_id, secret_hash, now, self.config.refresh_token_lifetime);

        let refresh_id = match self.repository.save_refresh_token(record).await {
            Ok(id) => id,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to store refresh record");
                return Err(match e {
                    DomainError::StoreFailure { .. } => e,
                    other => DomainError::store(other.to_string()),
                });
            }
        };

        let claims = Claims::new_access_token(
            user_id,
            refresh_id,
            &self.config.issuer,
            now,
            self.config.access_token_lifetime,
        );
        let access = self.signer.sign(&claims)?;
        let refresh = RefreshCredential::new(refresh_id, secret).encode();

        debug!(user_id = %user_id, refresh_id = %refresh_id, "Issued token pair");

        Ok(TokenPair::new(access, refresh))
    }

    /// Exchanges a token pair for a new one, consuming the old refresh record
    ///
    /// The access token must be authentic and bound to the presented refresh
    /// credential. Whether it may be expired is governed by
    /// `refresh_allows_expired_access`.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The rotated pair
    /// * `Err(DomainError::Token(TokenInvalid))` - Bad signature or shape,
    ///   mismatched pair, unknown or already used refresh record, wrong secret
    /// * `Err(DomainError::Token(TokenExpired))` - Expired access token while
    ///   the policy rejects them
    /// * `Err(DomainError::StoreFailure)` - The store could not be reached,
    ///   either for the lookup or for storing the replacement record. In the
    ///   latter case the old record is already consumed and the caller must
    ///   log in again.
    pub async fn refresh_pair(&self, access: &str, refresh: &str) -> DomainResult<TokenPair> {
        self.refresh_pair_at(access, refresh, Utc::now()).await
    }

    /// [`refresh_pair`](Self::refresh_pair) against an explicit clock
    pub async fn refresh_pair_at(
        &self,
        access: &str,
        refresh: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<TokenPair> {
        let claims = self.verify_signed(access)?;

        if !self.config.refresh_allows_expired_access && claims.is_expired_at(now) {
            debug!(user_id = %claims.sub, "Refresh rejected: access token expired");
            return Err(TokenError::TokenExpired.into());
        }

        let credential = RefreshCredential::decode(refresh).map_err(|e| {
            debug!(error = %e, "Refresh rejected: undecodable refresh credential");
            TokenError::TokenInvalid
        })?;

        if credential.record_id != claims.refresh_id {
            info!(
                user_id = %claims.sub,
                refresh_id = %credential.record_id,
                expected = %claims.refresh_id,
                "Refresh rejected: credential does not belong to access token"
            );
            return Err(TokenError::TokenInvalid.into());
        }

        let record = match self.repository.take_refresh_token(credential.record_id, now).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(
                    user_id = %claims.sub,
                    refresh_id = %credential.record_id,
                    "Refresh rejected: record unknown, used or expired"
                );
                return Err(TokenError::TokenInvalid.into());
            }
            Err(e) => {
                error!(refresh_id = %credential.record_id, error = %e, "Failed to take refresh record");
                return Err(e);
            }
        };

        if record.user_id != claims.sub {
            warn!(refresh_id = %record.id, "Refresh rejected: record owner differs from token subject");
            return Err(TokenError::TokenInvalid.into());
        }

        let matched = self
            .hasher
            .verify_blocking(credential.secret.to_vec(), record.secret_hash.clone())
            .await?;

        if !matched {
            warn!(
                user_id = %record.user_id,
                refresh_id = %record.id,
                "Refresh rejected: secret mismatch, record is now unusable"
            );
            return Err(TokenError::TokenInvalid.into());
        }

        let pair = self.mint_pair(record.user_id, now).await?;

        match self.repository.delete_refresh_token(record.id).await {
            Ok(_) => {}
            Err(e) => warn!(
                refresh_id = %record.id,
                error = %e,
                "Failed to delete consumed refresh record"
            ),
        }

        info!(user_id = %record.user_id, refresh_id = %record.id, "Rotated token pair");

        Ok(pair)
    }

    /// Checks an access token locally, without touching the store
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Authentic and unexpired
    /// * `Err(DomainError::Token(TokenInvalid))` - Bad signature or shape
    /// * `Err(DomainError::Token(TokenExpired))` - Authentic but `now >= exp`
    pub fn validate_access(&self, access: &str) -> DomainResult<Claims> {
        self.validate_access_at(access, Utc::now())
    }

    /// [`validate_access`](Self::validate_access) against an explicit clock
    pub fn validate_access_at(&self, access: &str, now: DateTime<Utc>) -> DomainResult<Claims> {
        let claims = self.verify_signed(access)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::TokenExpired.into());
        }

        Ok(claims)
    }

    /// Signature and shape check; signer detail collapses into `TokenInvalid`
    fn verify_signed(&self, access: &str) -> DomainResult<Claims> {
        self.signer.verify(access).map_err(|e| {
            debug!(error = %e, "Access token failed verification");
            DomainError::from(TokenError::TokenInvalid)
        })
    }
}

fn generate_refresh_secret() -> DomainResult<[u8; REFRESH_SECRET_LEN]> {
    let mut secret = [0u8; REFRESH_SECRET_LEN];
    OsRng
        .try_fill_bytes(&mut secret)
        .map_err(|e| DomainError::Internal {
            message: format!("Entropy source unavailable: {}", e),
        })?;
    Ok(secret)
}
