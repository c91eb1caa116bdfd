use anyhow::Result;

use crate::Config;

/// Application state and lifecycle manager
pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance from the on-disk config
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::with_config(config))
    }

    /// Create an application instance around an already loaded config
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Validate the configuration before any lookup runs
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!("Initializing application");

        let validation = self.config.check()?;
        tracing::debug!(
            "Config validated with {} warning(s)",
            validation.warnings.len()
        );

        if !self.config.weather.is_configured() {
            tracing::warn!("API keys missing - lookups will fail until they are configured");
        }

        tracing::info!("Application initialized successfully");
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_accepts_default_config() {
        let mut app = App::with_config(Config::default());
        assert!(app.initialize().is_ok());
        assert!(app.shutdown().is_ok());
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let mut config = Config::default();
        config.weather.weather_url = "nope".to_string();
        let mut app = App::with_config(config);
        assert!(app.initialize().is_err());
    }
}
