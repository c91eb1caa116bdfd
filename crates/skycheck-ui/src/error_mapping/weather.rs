use crate::services::weather_service::LookupFailure;
use skycheck_core::{AppError, LookupError};

impl From<LookupFailure> for AppError {
    fn from(e: LookupFailure) -> Self {
        match e {
            LookupFailure::Validation(_) => AppError::Lookup(LookupError::EmptyQuery),
            LookupFailure::Geocode(e) => AppError::Lookup(LookupError::Geocode(e.to_string())),
            LookupFailure::WeatherFetch(e) => {
                AppError::Lookup(LookupError::WeatherFetch(e.to_string()))
            }
        }
    }
}
