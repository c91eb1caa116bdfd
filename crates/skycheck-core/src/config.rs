use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding `weather.geocode_api_key`
pub const GEOCODE_API_KEY_ENV: &str = "SKYCHECK_GEOCODE_API_KEY";
/// Environment variable overriding `weather.weather_api_key`
pub const WEATHER_API_KEY_ENV: &str = "SKYCHECK_WEATHER_API_KEY";

pub const DEFAULT_GEOCODE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(skip, default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Geocoding and weather service settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// Settings for the two outbound services.
///
/// The API keys are passed through to the services untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenCage geocoding API key
    pub geocode_api_key: String,

    /// OpenWeatherMap API key
    pub weather_api_key: String,

    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// HTTP client timeout, applied by the network layer
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycheck")
}

fn default_geocode_url() -> String {
    DEFAULT_GEOCODE_URL.to_string()
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl WeatherConfig {
    /// Check if both API keys are configured (not placeholders)
    pub fn is_configured(&self) -> bool {
        is_real_key(&self.geocode_api_key) && is_real_key(&self.weather_api_key)
    }

    /// Replace the API keys with values from the environment, when set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(GEOCODE_API_KEY_ENV) {
            if !key.is_empty() {
                self.geocode_api_key = key;
            }
        }
        if let Ok(key) = std::env::var(WEATHER_API_KEY_ENV) {
            if !key.is_empty() {
                self.weather_api_key = key;
            }
        }
    }
}

fn is_real_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with("YOUR_")
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocode_api_key: "YOUR_OPENCAGE_API_KEY".to_string(),
            weather_api_key: "YOUR_OPENWEATHERMAP_API_KEY".to_string(),
            geocode_url: default_geocode_url(),
            weather_url: default_weather_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    /// API keys from the environment take precedence over the file.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.weather.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        if let Some(parent) = path.parent() {
            config.config_dir = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Validate, logging warnings and turning errors into a `ConfigError`
    pub fn check(&self) -> Result<ValidationResult> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()))
                .context("Configuration validation failed");
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.geocode_url, "weather.geocode_url", &mut result);
        self.validate_url(&self.weather.weather_url, "weather.weather_url", &mut result);

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 300 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>300s)",
            );
        }

        // Missing keys aren't fatal: the services reject the request and the
        // lookup surfaces its usual error message
        if !is_real_key(&self.weather.geocode_api_key) {
            result.add_warning(
                "weather.geocode_api_key",
                format!("Geocoding API key not configured (set {})", GEOCODE_API_KEY_ENV),
            );
        }
        if !is_real_key(&self.weather.weather_api_key) {
            result.add_warning(
                "weather.weather_api_key",
                format!("Weather API key not configured (set {})", WEATHER_API_KEY_ENV),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycheck");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_placeholder_keys_are_warnings() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(!config.weather.is_configured());
        assert!(result.warnings.iter().any(|w| w.field == "weather.geocode_api_key"));
        assert!(result.warnings.iter().any(|w| w.field == "weather.weather_api_key"));
    }

    #[test]
    fn test_configured_keys_have_no_warnings() {
        let mut config = Config::default();
        config.weather.geocode_api_key = "geo-key".to_string();
        config.weather.weather_api_key = "owm-key".to_string();
        let result = config.validate();
        assert!(config.weather.is_configured());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.geocode_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.geocode_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.weather_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.weather.request_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.request_timeout_secs"));
        assert!(config.check().is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skycheck").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.weather.geocode_url, DEFAULT_GEOCODE_URL);
        assert_eq!(config.weather.weather_url, DEFAULT_WEATHER_URL);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.weather.geocode_api_key = "geo-key".to_string();
        config.weather.request_timeout_secs = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.weather.geocode_api_key, "geo-key");
        assert_eq!(loaded.weather.request_timeout_secs, 5);
        assert_eq!(loaded.config_dir, dir.path());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[weather]\ngeocode_api_key = \"a\"\nweather_api_key = \"b\"\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.weather.geocode_api_key, "a");
        assert_eq!(loaded.weather.weather_api_key, "b");
        assert_eq!(loaded.weather.geocode_url, DEFAULT_GEOCODE_URL);
        assert_eq!(loaded.weather.request_timeout_secs, 10);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather\nbroken").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("parse"), "{}", err);
    }

    // The only test touching these variables, so it can't race another test
    #[test]
    fn test_env_overrides_skip_empty_values() {
        let mut weather = WeatherConfig {
            geocode_api_key: "file-geo".to_string(),
            weather_api_key: "file-owm".to_string(),
            ..WeatherConfig::default()
        };

        std::env::set_var(GEOCODE_API_KEY_ENV, "env-geo");
        std::env::set_var(WEATHER_API_KEY_ENV, "");
        weather.apply_env_overrides();
        std::env::remove_var(GEOCODE_API_KEY_ENV);
        std::env::remove_var(WEATHER_API_KEY_ENV);

        assert_eq!(weather.geocode_api_key, "env-geo");
        assert_eq!(weather.weather_api_key, "file-owm");
    }
}
