pub mod weather_service;

pub use weather_service::{
    request_submit, run_lookup, LookupFailure, WeatherCommand, WeatherServiceMessage,
};
