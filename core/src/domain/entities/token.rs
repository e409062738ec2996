//! Token entities for access/refresh pair authentication.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Size of the raw refresh secret in bytes
pub const REFRESH_SECRET_LEN: usize = 50;

/// Leading byte of the encoded refresh credential layout
pub const REFRESH_CREDENTIAL_VERSION: u8 = 1;

/// version byte + record id + raw secret
const REFRESH_CREDENTIAL_LEN: usize = 1 + 16 + REFRESH_SECRET_LEN;

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identity)
    pub sub: Uuid,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Refresh record that was minted together with this access token
    pub refresh_id: Uuid,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The identity the token is issued to
    /// * `refresh_id` - Id of the refresh record paired with this token
    /// * `issuer` - Value of the `iss` claim
    /// * `issued_at` - Issue time
    /// * `lifetime` - How long the token stays valid
    pub fn new_access_token(
        user_id: Uuid,
        refresh_id: Uuid,
        issuer: &str,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let expiry = issued_at + lifetime;

        Self {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            refresh_id,
        }
    }

    /// Expiry as a timestamp, `None` when `exp` is out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Issue time as a timestamp, `None` when `iat` is out of range
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Checks if the claims have expired at `now`
    ///
    /// A token is expired from the instant `now >= exp`. An unrepresentable
    /// expiry counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Refresh record as held by the credential store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Identity that owns this record
    pub user_id: Uuid,

    /// bcrypt hash of the raw refresh secret
    pub secret_hash: String,

    /// Timestamp when the record was created
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the record expires
    pub expires_at: DateTime<Utc>,

    /// Set once a refresh has claimed this record
    pub consumed_at: Option<DateTime<Utc>>,
}

impl RefreshRecord {
    /// Builds the stored form of a freshly inserted record
    pub fn from_new(id: Uuid, record: NewRefreshRecord) -> Self {
        Self {
            id,
            user_id: record.user_id,
            secret_hash: record.secret_hash,
            issued_at: record.issued_at,
            expires_at: record.expires_at,
            consumed_at: None,
        }
    }

    /// Checks if the record has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether a refresh has already claimed this record
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// A record can be redeemed only while unexpired and unclaimed
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && !self.is_consumed()
    }

    /// Marks the record as claimed
    pub fn consume(&mut self, now: DateTime<Utc>) {
        self.consumed_at = Some(now);
    }
}

/// Values needed to insert a refresh record; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshRecord {
    pub user_id: Uuid,
    pub secret_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewRefreshRecord {
    pub fn new(
        user_id: Uuid,
        secret_hash: String,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            user_id,
            secret_hash,
            issued_at,
            expires_at: issued_at + lifetime,
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token (header.claims.signature)
    pub access: String,

    /// Encoded refresh credential
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: String, refresh: String) -> Self {
        Self { access, refresh }
    }
}

/// Decoded refresh credential: which record to redeem, and the raw secret
/// whose hash that record holds.
///
/// Wire layout before base64url (no padding):
/// `[version: u8][record id: 16 bytes][secret: REFRESH_SECRET_LEN bytes]`
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshCredential {
    pub record_id: Uuid,
    pub secret: [u8; REFRESH_SECRET_LEN],
}

impl RefreshCredential {
    pub fn new(record_id: Uuid, secret: [u8; REFRESH_SECRET_LEN]) -> Self {
        Self { record_id, secret }
    }

    /// Encodes the credential for the client
    pub fn encode(&self) -> String {
        let mut buf = Vec::with_capacity(REFRESH_CREDENTIAL_LEN);
        buf.push(REFRESH_CREDENTIAL_VERSION);
        buf.extend_from_slice(self.record_id.as_bytes());
        buf.extend_from_slice(&self.secret);
        URL_SAFE_NO_PAD.encode(buf)
    }

    /// Splits an encoded credential back into record id and secret
    ///
    /// # Errors
    ///
    /// `TokenError::MalformedToken` when the input is not base64url, has the
    /// wrong length, or carries an unknown version byte.
    pub fn decode(encoded: &str) -> Result<Self, TokenError> {
        let raw = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(|_| TokenError::MalformedToken)?;

        if raw.len() != REFRESH_CREDENTIAL_LEN || raw[0] != REFRESH_CREDENTIAL_VERSION {
            return Err(TokenError::MalformedToken);
        }

        let record_id = Uuid::from_slice(&raw[1..17]).map_err(|_| TokenError::MalformedToken)?;
        let mut secret = [0u8; REFRESH_SECRET_LEN];
        secret.copy_from_slice(&raw[17..]);

        Ok(Self { record_id, secret })
    }
}

impl std::fmt::Debug for RefreshCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCredential")
            .field("record_id", &self.record_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
