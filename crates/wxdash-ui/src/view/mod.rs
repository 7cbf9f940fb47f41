//! Text rendering of the dashboard.
//!
//! `render` is a pure function of the session state and the current time.

mod backdrop;
pub mod format;
mod panels;

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use wxdash_weather::TemperatureUnit;

pub use backdrop::Backdrop;

use crate::models::{DashboardModel, RecentSearches, SessionStatus};
use crate::services::Snapshot;

/// Everything the renderer reads.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    pub status: &'a SessionStatus,
    pub snapshot: Option<&'a Snapshot>,
    pub recent: &'a RecentSearches,
    pub unit: TemperatureUnit,
    pub show_backdrop_url: bool,
}

impl<'a> DashboardView<'a> {
    pub fn from_model(model: &'a DashboardModel, show_backdrop_url: bool) -> Self {
        Self {
            status: model.status(),
            snapshot: model.snapshot().map(|s| s.as_ref()),
            recent: model.recent(),
            unit: model.unit(),
            show_backdrop_url,
        }
    }
}

pub fn render(view: &DashboardView<'_>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if let Err(e) = write_dashboard(&mut out, view, now) {
        tracing::error!("Failed to render dashboard: {}", e);
    }
    out
}

fn write_dashboard(out: &mut String, view: &DashboardView<'_>, now: DateTime<Utc>) -> fmt::Result {
    let backdrop = Backdrop::for_snapshot(view.snapshot);
    writeln!(out, "━━ wxdash ━━ {}", backdrop.label())?;
    if view.show_backdrop_url {
        writeln!(out, "{}", backdrop.url())?;
    }

    panels::status_line(out, view.status, view.snapshot.is_some())?;
    panels::recent_searches(out, view.recent)?;

    let Some(snapshot) = view.snapshot else {
        return Ok(());
    };

    writeln!(out)?;
    panels::current_conditions(out, snapshot, view.unit)?;
    writeln!(out)?;
    panels::clock(out, snapshot, now)?;
    writeln!(out)?;
    panels::forecast(out, snapshot)?;
    writeln!(out)?;
    panels::air_quality(out, snapshot)?;
    writeln!(out)?;
    panels::alerts(out, snapshot)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use chrono::TimeZone;
    use wxdash_weather::{
        AirQualitySample, Condition, Coordinates, CurrentWeather, ForecastList, ForecastSample,
        PollutantConcentrations, WeatherAlert,
    };

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, h, m, 0).unwrap()
    }

    fn snapshot() -> Snapshot {
        let samples = (0..40)
            .map(|i| ForecastSample {
                time: at(0, 0) + chrono::Duration::hours(3 * i),
                temperature: 20.0 + i as f64 / 10.0,
                condition: Condition {
                    main: if i == 8 { "Rain".into() } else { "Clouds".into() },
                    ..Condition::default()
                },
            })
            .collect();

        Snapshot {
            current: CurrentWeather {
                name: "Madrid".into(),
                country: Some("ES".into()),
                coordinates: Coordinates::new(40.42, -3.7),
                temperature: 27.6,
                feels_like: 28.2,
                humidity: 30,
                pressure: 1015.0,
                wind_speed: 2.57,
                condition: Condition {
                    main: "Clear".into(),
                    description: "clear sky".into(),
                    icon: "01d".into(),
                },
                sunrise: at(4, 45),
                sunset: at(19, 40),
                timezone_offset_secs: 7200,
            },
            forecast: ForecastList { samples },
            air_quality: AirQualitySample {
                aqi: 3,
                components: PollutantConcentrations {
                    co: 300.0,
                    no2: 45.0,
                    o3: 90.0,
                    pm2_5: 12.0,
                    pm10: 160.0,
                },
            },
            alerts: Vec::new(),
            unit: TemperatureUnit::Celsius,
            fetched_at: at(12, 0),
        }
    }

    fn view<'a>(
        status: &'a SessionStatus,
        snapshot: Option<&'a Snapshot>,
        recent: &'a RecentSearches,
    ) -> DashboardView<'a> {
        DashboardView {
            status,
            snapshot,
            recent,
            unit: TemperatureUnit::Celsius,
            show_backdrop_url: false,
        }
    }

    #[test]
    fn test_render_full_snapshot() {
        let snap = snapshot();
        let mut recent = RecentSearches::default();
        recent.push("Madrid");
        let out = render(&view(&SessionStatus::Ready, Some(&snap), &recent), at(12, 0));

        assert!(out.contains("clear skies"));
        assert!(out.contains("Madrid, ES"));
        assert!(out.contains("28°C"));
        assert!(out.contains("Humidity 30%"));
        assert!(out.contains("Sunrise 6:45 AM"));
        assert!(out.contains("Madrid time 2:00 PM (UTC+2)"));
        assert!(out.contains("Monday, June 3, 2024"));
        assert!(out.contains("from local"));
        assert!(out.contains("Unhealthy for Sensitive Groups"));
        assert!(out.contains("very unhealthy"));
        assert!(out.contains("No active weather alerts"));
        assert!(out.contains("1. Madrid"));
    }

    #[test]
    fn test_forecast_strip_has_five_days() {
        let snap = snapshot();
        let mut out = String::new();
        panels::forecast(&mut out, &snap).unwrap();

        assert_eq!(out.lines().count(), 6);
        assert!(out.lines().nth(2).unwrap().contains("Rain"));
        assert!(out.contains("23°C"));
    }

    #[test]
    fn test_alerts_panel() {
        let mut snap = snapshot();
        snap.alerts.push(WeatherAlert {
            event: "Heat Advisory".into(),
            description: "Very hot.\nStay hydrated.".into(),
            start: at(10, 0),
            end: at(18, 0),
        });

        let mut out = String::new();
        panels::alerts(&mut out, &snap).unwrap();
        assert!(out.contains("Heat Advisory (12:00 PM - 8:00 PM)"));
        assert!(out.contains("    Stay hydrated."));
    }

    #[test]
    fn test_loading_overlay_keeps_snapshot() {
        let snap = snapshot();
        let recent = RecentSearches::default();
        let out = render(&view(&SessionStatus::Fetching, Some(&snap), &recent), at(12, 0));

        assert!(out.contains("Updating"));
        assert!(out.contains("Madrid, ES"));
    }

    #[test]
    fn test_error_line_with_stale_snapshot() {
        let snap = snapshot();
        let recent = RecentSearches::default();
        let status = SessionStatus::Error("City not found. Please try again.".into());
        let out = render(&view(&status, Some(&snap), &recent), at(12, 0));

        assert!(out.contains("! City not found. Please try again."));
        assert!(out.contains("Madrid, ES"));
    }

    #[test]
    fn test_empty_session() {
        let recent = RecentSearches::default();
        let out = render(&view(&SessionStatus::Idle, None, &recent), at(12, 0));

        assert!(out.contains("mountains"));
        assert!(!out.contains("Forecast"));
    }

    #[test]
    fn test_backdrop_url_optional() {
        let recent = RecentSearches::default();
        let mut v = view(&SessionStatus::Idle, None, &recent);
        v.show_backdrop_url = true;
        assert!(render(&v, at(12, 0)).contains("images.unsplash.com"));
    }
}
