//! Display formatting for numbers and times.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use wxdash_weather::{CurrentWeather, TemperatureUnit};

/// Rounded temperature with its unit suffix, e.g. `23°C`.
pub fn temperature(value: f64, unit: TemperatureUnit) -> String {
    format!("{}{}", value.round() as i64, unit.symbol())
}

pub fn wind_speed(value: f64, unit: TemperatureUnit) -> String {
    format!("{:.1} {}", value, unit.wind_speed_unit())
}

/// 12-hour clock time, e.g. `6:05 AM`.
pub fn clock_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M %p").to_string()
}

/// Whole-hour UTC offset label, e.g. `UTC+5` or `UTC-3`.
pub fn utc_offset_label(offset_secs: i32) -> String {
    let hours = (f64::from(offset_secs) / 3600.0).round() as i64;
    if hours >= 0 {
        format!("UTC+{}", hours)
    } else {
        format!("UTC{}", hours)
    }
}

/// Full calendar date, e.g. `Monday, June 3, 2024`.
pub fn long_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%A, %B %-d, %Y").to_string()
}

/// How far the city's clock is ahead of the local one, in whole hours.
pub fn hours_from_local(city_offset_secs: i32, local_offset_secs: i32) -> String {
    let hours = (f64::from(city_offset_secs - local_offset_secs) / 3600.0).round() as i64;
    match hours {
        1 | -1 => format!("{:+} hour from local", hours),
        _ => format!("{:+} hours from local", hours),
    }
}

/// The city's fixed offset, or UTC when the provider sent an invalid one.
pub fn city_offset(current: &CurrentWeather) -> FixedOffset {
    current.utc_offset().unwrap_or_else(|| Utc.fix())
}

/// `instant` as seen in the city.
pub fn city_time(instant: DateTime<Utc>, current: &CurrentWeather) -> DateTime<FixedOffset> {
    instant.with_timezone(&city_offset(current))
}
