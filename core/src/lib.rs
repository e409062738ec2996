//! # TokenPair Core
//!
//! Token lifecycle engine for the TokenPair backend.
//! This crate contains the token entities, the error taxonomy, the credential
//! store interface with its in-memory implementation, and the services that
//! sign, hash, issue, rotate and validate token pairs.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::token::{Claims, RefreshCredential, RefreshRecord, TokenPair};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{InMemoryTokenRepository, TokenRepository};
pub use services::{TokenCleanupService, TokenService, TokenServiceConfig};
