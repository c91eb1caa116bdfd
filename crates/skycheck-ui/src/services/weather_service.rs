//! Weather backend: the geocode-then-fetch lookup and its messages.
//! Runs are spawned on the tokio runtime; state changes go out via mpsc.

use std::sync::Arc;

use skycheck_weather::{
    GeocodeError, GeocodeResolver, LocationQuery, ValidationError, WeatherFetchError,
    WeatherFetcher, WeatherSnapshot,
};
use tokio::task::JoinHandle;

use crate::models::weather_model::{PipelineState, WeatherModel};

/// Why a lookup run failed, one variant per stage
#[derive(Debug)]
pub enum LookupFailure {
    Validation(ValidationError),
    Geocode(GeocodeError),
    WeatherFetch(WeatherFetchError),
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::Validation(e) => write!(f, "Invalid query: {}", e),
            LookupFailure::Geocode(e) => write!(f, "Geocoding failed: {}", e),
            LookupFailure::WeatherFetch(e) => write!(f, "Weather fetch failed: {}", e),
        }
    }
}

impl std::error::Error for LookupFailure {}

impl From<ValidationError> for LookupFailure {
    fn from(e: ValidationError) -> Self {
        LookupFailure::Validation(e)
    }
}

/// Inbound messages from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherCommand {
    /// Start a fresh lookup for the given location text
    Submit(String),
}

/// Messages sent from the coordinator back to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherServiceMessage {
    /// The pipeline state was replaced
    StateChanged(PipelineState),
}

/// Geocode `query`, then fetch weather at the result.
/// The weather service is never contacted when geocoding fails.
pub async fn run_lookup(
    geocoder: &GeocodeResolver,
    fetcher: &WeatherFetcher,
    query: &LocationQuery,
) -> Result<WeatherSnapshot, LookupFailure> {
    let coords = geocoder
        .resolve(query)
        .await
        .map_err(LookupFailure::Geocode)?;

    fetcher
        .fetch(coords)
        .await
        .map_err(LookupFailure::WeatherFetch)
}

/// Handle `command` on the runtime without waiting for it.
/// Results arrive as `StateChanged` messages on the model's subscribers.
pub fn request_submit(
    runtime: &tokio::runtime::Handle,
    model: Arc<WeatherModel>,
    command: WeatherCommand,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        model.handle(command).await;
    })
}
