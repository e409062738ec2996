//! Startup configuration and tracing setup for the binary

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use tp_shared::{AppConfig, LoggingConfig};

/// Load `.env` (if present) and the environment, then validate
pub fn load_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config =
        AppConfig::from_env().map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    Ok(config)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {}", e);
    }
}
