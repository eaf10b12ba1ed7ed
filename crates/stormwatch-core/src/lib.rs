pub mod config;
pub mod error;

pub use config::{
    Config, LocationConfig, LocationProviderKind, UiConfig, Units, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, ConfigError, LocationError, StorageError, WeatherError};

use anyhow::Result;

/// Initialize logging for the process.
///
/// Output goes to stderr so stdout only carries rendered weather.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("Stormwatch core initialized");
    Ok(())
}
