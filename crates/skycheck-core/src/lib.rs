pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{Config, ConfigValidationError, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError, LookupError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Logs go to stderr so rendered weather on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Skycheck core initialized");
    Ok(())
}
