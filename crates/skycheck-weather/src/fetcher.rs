//! Current weather from the OpenWeatherMap API, in metric units.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::types::{Coordinates, WeatherFetchError, WeatherSnapshot, SELECTED_RESULT_INDEX};

/// Celsius and m/s
const UNITS: &str = "metric";

#[derive(Debug, Serialize)]
struct CurrentWeatherParams<'a> {
    lat: f64,
    lon: f64,
    appid: &'a str,
    units: &'a str,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    #[serde(default)]
    weather: Vec<ConditionEntry>,
    main: MainBlock,
    wind: WindBlock,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

impl CurrentWeatherResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherFetchError> {
        let condition = self
            .weather
            .into_iter()
            .nth(SELECTED_RESULT_INDEX)
            .ok_or(WeatherFetchError::MissingField("weather"))?;

        Ok(WeatherSnapshot {
            name: self.name,
            description: condition.description,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
        })
    }
}

/// Weather fetcher: one request per coordinate pair, current conditions only.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    client: Client,
    url: String,
    api_key: String,
}

impl WeatherFetcher {
    pub fn new(client: Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch current conditions at `coords`. Coordinates are sent as-is;
    /// out-of-range values are left for the service to reject.
    pub async fn fetch(&self, coords: Coordinates) -> Result<WeatherSnapshot, WeatherFetchError> {
        tracing::debug!(
            "Fetching weather for {}, {}",
            coords.latitude,
            coords.longitude
        );

        let params = CurrentWeatherParams {
            lat: coords.latitude,
            lon: coords.longitude,
            appid: &self.api_key,
            units: UNITS,
        };

        let response = self.client.get(&self.url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Weather service returned status {}", status);
            return Err(WeatherFetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: CurrentWeatherResponse = serde_json::from_slice(&body)?;
        let snapshot = parsed.into_snapshot()?;

        tracing::info!(
            "Weather for {}: {}, {}°C",
            snapshot.name,
            snapshot.description,
            snapshot.temperature
        );
        Ok(snapshot)
    }
}
