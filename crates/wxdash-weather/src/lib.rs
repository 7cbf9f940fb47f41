//! Weather data for wxdash
//!
//! Wraps the OpenWeatherMap read endpoints (current weather, forecast, air
//! quality, alerts) behind typed requests, and resolves the device location.

pub mod air_quality;
pub mod error;
pub mod location;
pub mod provider;
pub mod types;

pub use air_quality::{pollutant_severity, AqiLevel, Pollutant, PollutantLevel};
pub use error::{LocationError, WeatherError};
pub use location::LocationSource;
pub use provider::WeatherProvider;
pub use types::*;
pub use wxdash_core::TemperatureUnit;
