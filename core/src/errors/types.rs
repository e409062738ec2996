//! Token error taxonomy

use thiserror::Error;

/// Token-related errors
///
/// `InvalidSignature` and `MalformedToken` are produced by the verifier;
/// the engine reports both to its callers as `TokenInvalid`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, wrongly signed, unknown, consumed or mismatched credential
    #[error("Token invalid")]
    TokenInvalid,

    /// Structurally valid but past its expiry
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken,
}
