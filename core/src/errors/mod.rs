//! Domain-specific error types and error handling.

mod types;

pub use types::TokenError;

use thiserror::Error;

/// Errors surfaced by the token lifecycle engine
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Issuance failed; no credential was produced
    #[error("Could not authenticate")]
    Unauthenticated,

    /// The credential store failed or is unreachable
    #[error("Credential store failure: {message}")]
    StoreFailure { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Shorthand for a store failure with context
    pub fn store(message: impl Into<String>) -> Self {
        DomainError::StoreFailure {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
