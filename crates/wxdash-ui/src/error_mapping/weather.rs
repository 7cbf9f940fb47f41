use crate::services::{Addressing, FetchError};
use wxdash_core::{AppError, WeatherError};

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(name) => AppError::Weather(WeatherError::CityNotFound(name)),
            FetchError::Provider {
                addressing: Addressing::Coordinates,
                detail,
            } => AppError::Weather(WeatherError::LocationWeatherUnavailable(detail)),
            FetchError::Provider {
                addressing: Addressing::Name,
                detail,
            } => AppError::Weather(WeatherError::ApiError(detail)),
        }
    }
}
