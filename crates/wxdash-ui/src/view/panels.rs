use std::fmt::{self, Write};

use chrono::{DateTime, Local, Offset, Utc};
use wxdash_weather::{Pollutant, TemperatureUnit};

use super::format::{
    city_time, clock_time, hours_from_local, long_date, temperature, utc_offset_label, wind_speed,
};
use crate::models::{RecentSearches, SessionStatus};
use crate::services::Snapshot;

pub(super) fn status_line(out: &mut String, status: &SessionStatus, has_data: bool) -> fmt::Result {
    match status {
        SessionStatus::Idle => writeln!(out, "Type a city name, or :locate to use this device."),
        SessionStatus::ResolvingLocation => writeln!(out, "… Detecting your location"),
        SessionStatus::Fetching if has_data => writeln!(out, "… Updating (showing previous result)"),
        SessionStatus::Fetching => writeln!(out, "… Loading weather"),
        SessionStatus::Ready => Ok(()),
        SessionStatus::Error(message) => writeln!(out, "! {}", message),
    }
}

pub(super) fn recent_searches(out: &mut String, recent: &RecentSearches) -> fmt::Result {
    if recent.is_empty() {
        return Ok(());
    }
    let entries: Vec<String> = recent
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect();
    writeln!(out, "Recent: {}", entries.join("  "))
}

pub(super) fn current_conditions(
    out: &mut String,
    snapshot: &Snapshot,
    preferred: TemperatureUnit,
) -> fmt::Result {
    let current = &snapshot.current;
    let unit = snapshot.unit;

    match &current.country {
        Some(country) => writeln!(out, "{}, {}", current.name, country)?,
        None => writeln!(out, "{}", current.name)?,
    }
    writeln!(
        out,
        "  {}  {}    [:units → {}]",
        temperature(current.temperature, unit),
        current.condition.description,
        preferred.toggled().symbol()
    )?;
    writeln!(
        out,
        "  Feels like {}   Humidity {}%   Wind {}   Pressure {} hPa",
        temperature(current.feels_like, unit),
        current.humidity,
        wind_speed(current.wind_speed, unit),
        current.pressure.round() as i64
    )?;
    writeln!(
        out,
        "  Sunrise {}   Sunset {}",
        clock_time(&city_time(current.sunrise, current)),
        clock_time(&city_time(current.sunset, current))
    )
}

pub(super) fn clock(out: &mut String, snapshot: &Snapshot, now: DateTime<Utc>) -> fmt::Result {
    let current = &snapshot.current;
    let local = now.with_timezone(&Local);
    let city = city_time(now, current);
    writeln!(
        out,
        "Local time {}   {} time {} ({})",
        clock_time(&local),
        current.name,
        clock_time(&city),
        utc_offset_label(current.timezone_offset_secs)
    )?;
    writeln!(
        out,
        "  {}   {}",
        long_date(&city),
        hours_from_local(city.offset().local_minus_utc(), local.offset().fix().local_minus_utc())
    )
}

pub(super) fn forecast(out: &mut String, snapshot: &Snapshot) -> fmt::Result {
    let days = snapshot.forecast.daily();
    if days.is_empty() {
        return writeln!(out, "Forecast unavailable");
    }

    writeln!(out, "Forecast")?;
    for day in days {
        writeln!(
            out,
            "  {:<4}{:<14}{:>6}",
            city_time(day.time, &snapshot.current).format("%a"),
            day.condition.main,
            temperature(day.temperature, snapshot.unit)
        )?;
    }
    Ok(())
}

pub(super) fn air_quality(out: &mut String, snapshot: &Snapshot) -> fmt::Result {
    let sample = &snapshot.air_quality;
    let level = sample.level();

    writeln!(out, "Air quality: {} (AQI {})", level.label(), sample.aqi)?;
    writeln!(out, "  {}", level.description())?;
    for pollutant in Pollutant::ALL {
        let value = pollutant.concentration(&sample.components);
        writeln!(
            out,
            "  {:<6}{:>9.1} μg/m³  {}",
            pollutant.display_name(),
            value,
            pollutant.severity(value).label()
        )?;
    }
    Ok(())
}

pub(super) fn alerts(out: &mut String, snapshot: &Snapshot) -> fmt::Result {
    if snapshot.alerts.is_empty() {
        return writeln!(out, "No active weather alerts");
    }

    writeln!(out, "Weather alerts")?;
    for alert in &snapshot.alerts {
        writeln!(
            out,
            "  ⚠ {} ({} - {})",
            alert.event,
            clock_time(&city_time(alert.start, &snapshot.current)),
            clock_time(&city_time(alert.end, &snapshot.current))
        )?;
        for line in alert.description.lines().filter(|l| !l.trim().is_empty()) {
            writeln!(out, "    {}", line.trim())?;
        }
    }
    Ok(())
}
