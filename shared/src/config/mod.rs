//! Configuration module with per-concern sub-modules
//!
//! - `auth` - Access token signing and refresh lifetime configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export commonly used types
pub use auth::TokenConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use server::ServerConfig;

/// Read an environment variable, trimmed, treating an empty value as unset
pub(crate) fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse an environment variable, falling back to `default` only when it is
/// unset. A value that does not parse is an error naming the key.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    parse_or(key, env_value(key), default)
}

/// Boolean counterpart of [`env_or`]; see [`parse_flag`] for accepted spellings
pub(crate) fn env_flag(key: &str, default: bool) -> Result<bool, String> {
    parse_flag(key, env_value(key), default)
}

pub(crate) fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, String> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| format!("{} has an invalid value: {:?}", key, value)),
    }
}

/// Case-insensitive `true/false`, `1/0`, `yes/no` or `on/off`
pub(crate) fn parse_flag(key: &str, raw: Option<String>, default: bool) -> Result<bool, String> {
    match raw {
        None => Ok(default),
        Some(value) => match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(format!("{} is not a boolean: {:?}", key, value)),
        },
    }
}

/// Which credential store backs refresh records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable MySQL store
    Mysql,
    /// In-process map, lost on restart
    Memory,
}

impl StorageBackend {
    /// Read `TOKEN_STORE`, defaulting to memory in development and MySQL elsewhere
    pub fn from_env(environment: Environment) -> Result<Self, String> {
        match env_value("TOKEN_STORE") {
            Some(value) => value.parse(),
            None if environment.is_development() => Ok(StorageBackend::Memory),
            None => Ok(StorageBackend::Mysql),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "db" => Ok(StorageBackend::Mysql),
            "memory" | "in-memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid token store: {}", s)),
        }
    }
}

/// Expired refresh record cleanup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

impl CleanupConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            interval_seconds: env_or("TOKEN_CLEANUP_INTERVAL", defaults.interval_seconds)?,
            enabled: env_flag("TOKEN_CLEANUP_ENABLED", defaults.enabled)?,
        })
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token configuration
    pub token: TokenConfig,

    /// Credential store selection
    pub storage: StorageBackend,

    /// Cleanup configuration
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            token: TokenConfig::default(),
            storage: StorageBackend::Memory,
            cleanup: CleanupConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    ///
    /// Fails on the first variable that is set but cannot be parsed.
    pub fn from_env() -> Result<Self, String> {
        let environment = Environment::from_env()?;
        Ok(Self {
            environment,
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            token: TokenConfig::from_env()?,
            storage: StorageBackend::from_env(environment)?,
            cleanup: CleanupConfig::from_env()?,
            logging: LoggingConfig::for_environment(environment),
        })
    }

    /// Validate the assembled configuration
    pub fn validate(&self) -> Result<(), String> {
        self.token.validate()?;
        if self.cleanup.enabled && self.cleanup.interval_seconds == 0 {
            return Err("cleanup interval must be positive".to_string());
        }
        Ok(())
    }
}
