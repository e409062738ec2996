//! Shared configuration and common types for the TokenPair server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types loaded from the environment
//! - The JSON error envelope returned by the HTTP layer

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CleanupConfig, DatabaseConfig, Environment, LoggingConfig, ServerConfig,
    StorageBackend, TokenConfig,
};
pub use errors::{error_codes, ErrorResponse};
