//! Business services containing domain logic and use cases.

pub mod token;

pub use token::{
    CleanupResult, SecretHasher, TokenCleanupService, TokenService, TokenServiceConfig,
    TokenSigner,
};
