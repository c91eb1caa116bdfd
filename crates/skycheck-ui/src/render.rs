//! Plain-text rendering of the lookup state.

use crate::models::weather_model::PipelineState;

/// Text for `state`; empty while idle.
pub fn render_state(state: &PipelineState) -> String {
    match state {
        PipelineState::Idle => String::new(),
        PipelineState::Loading => "Loading...".to_string(),
        PipelineState::Failed(message) => message.clone(),
        PipelineState::Success(weather) => format!(
            "{}\n{}\n{}°C\nHumidity: {}%\nWind Speed: {} m/s",
            weather.name,
            weather.description,
            weather.temperature,
            weather.humidity,
            weather.wind_speed
        ),
    }
}
