//! Weather lookup stages for Skycheck
//!
//! Resolves free-text locations to coordinates via OpenCage and fetches
//! current conditions for them from OpenWeatherMap.

pub mod fetcher;
pub mod geocode;
pub mod http;
pub mod types;

pub use fetcher::WeatherFetcher;
pub use geocode::GeocodeResolver;
pub use http::build_client;
pub use types::*;
