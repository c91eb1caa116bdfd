//! Forward geocoding: convert a free-text location to coordinates.
//! Uses the OpenCage geocoding API.

use reqwest::Client;
use serde::Deserialize;

use crate::types::{Coordinates, GeocodeError, LocationQuery, SELECTED_RESULT_INDEX};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

/// Geocode resolver: one request per query, first result wins.
#[derive(Debug, Clone)]
pub struct GeocodeResolver {
    client: Client,
    url: String,
    api_key: String,
}

impl GeocodeResolver {
    pub fn new(client: Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Resolve `query` to the coordinates of the service's first result.
    pub async fn resolve(&self, query: &LocationQuery) -> Result<Coordinates, GeocodeError> {
        tracing::debug!("Geocoding '{}'", query);

        let response = self
            .client
            .get(&self.url)
            .query(&[("q", query.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Geocoding returned status {}", status);
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: GeocodeResponse = serde_json::from_slice(&body)?;

        let result = parsed
            .results
            .into_iter()
            .nth(SELECTED_RESULT_INDEX)
            .ok_or_else(|| GeocodeError::NoResults(query.to_string()))?;

        let coords = Coordinates::new(result.geometry.lat, result.geometry.lng);
        tracing::info!(
            "Geocoded '{}' to {}, {}",
            query,
            coords.latitude,
            coords.longitude
        );
        Ok(coords)
    }
}
