//! Token service module
//!
//! - HS512 signing and verification of access tokens
//! - bcrypt hashing of refresh secrets
//! - Issue, rotation and validation of token pairs
//! - Background cleanup of unredeemable refresh records

mod cleanup;
mod config;
mod hasher;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use hasher::SecretHasher;
pub use service::TokenService;
pub use signer::TokenSigner;
