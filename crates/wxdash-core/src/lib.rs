pub mod config;
pub mod error;

pub use config::{
    Config, LocationConfig, LoggingConfig, TemperatureUnit, UiConfig, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, ConfigError, LocationError, WeatherError};

use anyhow::Result;

/// Initialize logging for the dashboard.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so log
/// lines never interleave with the rendered dashboard.
pub fn init(default_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("wxdash core initialized");
    Ok(())
}
