use serde::{Deserialize, Serialize};

/// Which entry of a service's result list is taken as authoritative.
///
/// Both stages always take index 0: the geocoder's first result and the
/// weather service's first condition entry. No ranking or disambiguation.
pub const SELECTED_RESULT_INDEX: usize = 0;

/// Free-text location entered by the user. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Accepts any non-empty text. Whitespace-only input is passed through
    /// to the geocoder as typed.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current conditions for one place, in metric units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub description: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Metres per second
    pub wind_speed: f64,
}

/// API keys for the two services, passed through to requests untouched
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub geocode_api_key: String,
    pub weather_api_key: String,
}

impl ApiCredentials {
    pub fn new(geocode_api_key: impl Into<String>, weather_api_key: impl Into<String>) -> Self {
        Self {
            geocode_api_key: geocode_api_key.into(),
            weather_api_key: weather_api_key.into(),
        }
    }
}

// Keys stay out of logs
impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("geocode_api_key", &"<redacted>")
            .field("weather_api_key", &"<redacted>")
            .finish()
    }
}

/// Service base URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub geocode_url: String,
    pub weather_url: String,
}

impl Endpoints {
    pub const OPENCAGE_GEOCODE_URL: &'static str = "https://api.opencagedata.com/geocode/v1/json";
    pub const OPENWEATHERMAP_CURRENT_URL: &'static str =
        "https://api.openweathermap.org/data/2.5/weather";

    pub fn new(geocode_url: impl Into<String>, weather_url: impl Into<String>) -> Self {
        Self {
            geocode_url: geocode_url.into(),
            weather_url: weather_url.into(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(Self::OPENCAGE_GEOCODE_URL, Self::OPENWEATHERMAP_CURRENT_URL)
    }
}

/// Rejected before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Location query is empty")]
    EmptyQuery,
}

/// Geocoding stage errors
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Geocoding service returned status {0}")]
    Status(u16),
    #[error("No results for '{0}'")]
    NoResults(String),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Weather fetch stage errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherFetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather service returned status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Response missing field: {0}")]
    MissingField(&'static str),
}
