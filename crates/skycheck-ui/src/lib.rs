//! Presentation-side plumbing for Skycheck: the lookup coordinator, its
//! service messages and a plain-text renderer.

pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod services;

pub use app_services::AppServices;
pub use models::weather_model::{PipelineState, WeatherModel};
pub use render::render_state;
pub use services::{LookupFailure, WeatherCommand, WeatherServiceMessage};
