//! Centralized error types for Skycheck.
//!
//! Lookup failures carry technical detail for logging, but the UI only ever
//! shows the fixed message returned by `user_message()`.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Lookup(e) => e.user_message(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Location-to-weather lookup errors, one variant per pipeline stage.
///
/// The payload is diagnostic detail only; it never reaches the user.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Empty location query")]
    EmptyQuery,

    #[error("Geocoding failed: {0}")]
    Geocode(String),

    #[error("Weather fetch failed: {0}")]
    WeatherFetch(String),
}

impl LookupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::EmptyQuery => "Please enter a location.",
            LookupError::Geocode(_) => {
                "Failed to retrieve location. Please enter a valid location."
            }
            LookupError::WeatherFetch(_) => "Failed to fetch weather data. Please try again.",
        }
    }
}
