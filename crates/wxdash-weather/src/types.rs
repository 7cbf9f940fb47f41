use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::air_quality::AqiLevel;

/// Forecast samples are three hours apart; every 8th one is one per day.
pub const SAMPLES_PER_DAY: usize = 8;

/// Number of days shown in the forecast strip.
pub const FORECAST_DAYS: usize = 5;

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A resolved device location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: Coordinates,
    pub accuracy_meters: Option<f64>,
}

impl From<Coordinates> for Location {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            accuracy_meters: None,
        }
    }
}

/// Provider condition descriptor (`weather[0]` in OpenWeatherMap payloads)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Coarse keyword such as "Clear", "Clouds", "Rain"
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Current conditions for a named place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Display name as resolved by the provider
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    /// hPa
    pub pressure: f64,
    pub wind_speed: f64,
    pub condition: Condition,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Shift from UTC in seconds
    pub timezone_offset_secs: i32,
}

impl CurrentWeather {
    pub(crate) fn from_api(api: ApiCurrentWeather) -> Self {
        Self {
            name: api.name,
            country: api.sys.country,
            coordinates: Coordinates::new(api.coord.lat, api.coord.lon),
            temperature: api.main.temp,
            feels_like: api.main.feels_like,
            humidity: api.main.humidity,
            pressure: api.main.pressure,
            wind_speed: api.wind.speed,
            condition: api.weather.into_iter().next().map(Condition::from).unwrap_or_default(),
            sunrise: timestamp(api.sys.sunrise),
            sunset: timestamp(api.sys.sunset),
            timezone_offset_secs: api.timezone,
        }
    }

    /// The place's UTC offset, if the provider sent a valid one.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.timezone_offset_secs)
    }
}

/// One forecast sample (3-hour step)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub condition: Condition,
}

/// Time-ordered forecast samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastList {
    pub samples: Vec<ForecastSample>,
}

impl ForecastList {
    pub(crate) fn from_api(api: ApiForecast) -> Self {
        let samples = api
            .list
            .into_iter()
            .map(|item| ForecastSample {
                time: timestamp(item.dt),
                temperature: item.main.temp,
                condition: item.weather.into_iter().next().map(Condition::from).unwrap_or_default(),
            })
            .collect();
        Self { samples }
    }

    /// One sample per day: indices 0, 8, 16, ... capped at five entries.
    ///
    /// The day's temperature is that single sample, not an aggregate.
    pub fn daily(&self) -> Vec<&ForecastSample> {
        self.samples
            .iter()
            .step_by(SAMPLES_PER_DAY)
            .take(FORECAST_DAYS)
            .collect()
    }
}

/// Pollutant concentrations in μg/m³
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollutantConcentrations {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

/// The most recent air-quality reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    /// Provider ordinal, 1 (good) to 5 (very poor)
    pub aqi: i64,
    pub components: PollutantConcentrations,
}

impl AirQualitySample {
    pub fn level(&self) -> AqiLevel {
        AqiLevel::from_ordinal(self.aqi)
    }
}

/// An active weather alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub event: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

// OpenWeatherMap wire types

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl From<ApiCondition> for Condition {
    fn from(api: ApiCondition) -> Self {
        Self {
            main: api.main,
            description: api.description,
            icon: api.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiSys {
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrentWeather {
    pub coord: ApiCoord,
    pub main: ApiMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    #[serde(default)]
    pub wind: ApiWind,
    pub name: String,
    #[serde(default)]
    pub sys: ApiSys,
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastItem {
    pub dt: i64,
    pub main: ApiForecastMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecast {
    #[serde(default)]
    pub list: Vec<ApiForecastItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAqiMain {
    pub aqi: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAirQualityItem {
    pub main: ApiAqiMain,
    #[serde(default)]
    pub components: PollutantConcentrations,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAirQuality {
    #[serde(default)]
    pub list: Vec<ApiAirQualityItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlert {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
}

impl From<ApiAlert> for WeatherAlert {
    fn from(api: ApiAlert) -> Self {
        Self {
            event: api.event,
            description: api.description,
            start: timestamp(api.start),
            end: timestamp(api.end),
        }
    }
}

/// One Call response restricted to alerts; the field is absent when none are active.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlerts {
    #[serde(default)]
    pub alerts: Vec<ApiAlert>,
}

/// Body of a non-success OpenWeatherMap response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
}
