//! Weather backend: snapshot assembly and async fetch tasks.
//! Network work runs on spawned tasks; results come back via mpsc tagged
//! with the attempt's generation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use wxdash_weather::{
    AirQualitySample, Coordinates, CurrentWeather, ForecastList, Location, LocationError,
    LocationSource, TemperatureUnit, WeatherAlert, WeatherProvider,
};

/// What a fetch attempt is keyed on.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coords(Coordinates),
}

/// How the location of a failed attempt was addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    Name,
    Coordinates,
}

/// The merged result of one fetch cycle. Never partially filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub current: CurrentWeather,
    pub forecast: ForecastList,
    pub air_quality: AirQualitySample,
    pub alerts: Vec<WeatherAlert>,
    /// Unit the temperatures were requested in
    pub unit: TemperatureUnit,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Provider's display name for the location.
    pub fn resolved_name(&self) -> &str {
        &self.current.name
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The provider could not resolve the city name.
    #[error("City not found: {0}")]
    NotFound(String),

    /// A required call failed after the location was known.
    #[error("Weather provider error: {detail}")]
    Provider {
        addressing: Addressing,
        detail: String,
    },
}

/// Messages sent from async operations back to the session
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Device location lookup finished
    LocationDone {
        generation: u64,
        result: Result<Location, LocationError>,
    },
    /// Snapshot assembly finished
    FetchDone {
        generation: u64,
        query: Query,
        result: Result<Snapshot, FetchError>,
    },
}

impl WeatherServiceMessage {
    pub fn generation(&self) -> u64 {
        match self {
            Self::LocationDone { generation, .. } | Self::FetchDone { generation, .. } => {
                *generation
            }
        }
    }
}

/// Assemble a snapshot for either kind of query.
pub async fn assemble(
    provider: &WeatherProvider,
    query: &Query,
    unit: TemperatureUnit,
) -> Result<Snapshot, FetchError> {
    match query {
        Query::City(name) => assemble_by_name(provider, name, unit).await,
        Query::Coords(coords) => assemble_by_coords(provider, *coords, unit).await,
    }
}

/// Current + forecast by name, then air quality + alerts at the resolved coordinates.
///
/// Any failure of the first pair reads as "not found".
pub async fn assemble_by_name(
    provider: &WeatherProvider,
    name: &str,
    unit: TemperatureUnit,
) -> Result<Snapshot, FetchError> {
    let (current, forecast) = tokio::try_join!(
        provider.fetch_current_by_name(name, unit),
        provider.fetch_forecast_by_name(name, unit),
    )
    .map_err(|e| {
        if e.is_not_found() {
            tracing::info!("No city matches {:?}: {}", name, e);
        } else {
            tracing::warn!("Lookup for {:?} failed: {}", name, e);
        }
        FetchError::NotFound(name.to_string())
    })?;

    complete(provider, current, forecast, unit, Addressing::Name).await
}

pub async fn assemble_by_coords(
    provider: &WeatherProvider,
    coords: Coordinates,
    unit: TemperatureUnit,
) -> Result<Snapshot, FetchError> {
    let (current, forecast) = tokio::try_join!(
        provider.fetch_current_by_coords(coords, unit),
        provider.fetch_forecast_by_coords(coords, unit),
    )
    .map_err(|e| {
        tracing::warn!("Weather for {:?} failed: {}", coords, e);
        FetchError::Provider {
            addressing: Addressing::Coordinates,
            detail: e.to_string(),
        }
    })?;

    complete(provider, current, forecast, unit, Addressing::Coordinates).await
}

async fn complete(
    provider: &WeatherProvider,
    current: CurrentWeather,
    forecast: ForecastList,
    unit: TemperatureUnit,
    addressing: Addressing,
) -> Result<Snapshot, FetchError> {
    let coords = current.coordinates;

    // Alerts never fail; air quality is required.
    let (air_quality, alerts) = tokio::join!(
        provider.fetch_air_quality(coords),
        provider.fetch_alerts(coords),
    );
    let air_quality = air_quality.map_err(|e| {
        tracing::warn!("Air quality for {} failed: {}", current.name, e);
        FetchError::Provider {
            addressing,
            detail: e.to_string(),
        }
    })?;

    Ok(Snapshot {
        current,
        forecast,
        air_quality,
        alerts,
        unit,
        fetched_at: Utc::now(),
    })
}

/// Request a snapshot asynchronously.
/// Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    tx: &UnboundedSender<WeatherServiceMessage>,
    provider: Arc<WeatherProvider>,
    generation: u64,
    query: Query,
    unit: TemperatureUnit,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = assemble(&provider, &query, unit).await;
        if let Err(e) = &result {
            tracing::info!("Fetch #{} failed: {}", generation, e);
        }
        let _ = tx.send(WeatherServiceMessage::FetchDone {
            generation,
            query,
            result,
        });
    });
}

/// Request the device location asynchronously.
/// Sends `LocationDone` on the channel when complete.
pub fn request_locate(
    tx: &UnboundedSender<WeatherServiceMessage>,
    source: LocationSource,
    generation: u64,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = source.resolve().await;
        match &result {
            Ok(location) => tracing::info!(
                "Got location: {}, {}",
                location.coordinates.latitude,
                location.coordinates.longitude
            ),
            Err(e) => tracing::warn!("Location failed: {}", e),
        }
        let _ = tx.send(WeatherServiceMessage::LocationDone { generation, result });
    });
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "coord": {"lat": 35.69, "lon": 139.69},
            "main": {"temp": 22.0, "feels_like": 21.5, "humidity": 50, "pressure": 1010},
            "weather": [{"main": "Rain", "description": "light rain", "icon": "10d"}],
            "wind": {"speed": 2.0},
            "name": "Tokyo",
            "sys": {"country": "JP", "sunrise": 1700000000, "sunset": 1700040000},
            "timezone": 32400
        })
    }

    async fn healthy_server() -> MockServer {
        let server = MockServer::start().await;
        mount(&server, "/weather", 200, current_body()).await;
        mount(
            &server,
            "/forecast",
            200,
            serde_json::json!({"list": [{"dt": 1700000000, "main": {"temp": 21.0}, "weather": []}]}),
        )
        .await;
        mount(
            &server,
            "/air_pollution",
            200,
            serde_json::json!({"list": [{"main": {"aqi": 3}, "components": {}}]}),
        )
        .await;
        server
    }

    fn provider(server: &MockServer) -> WeatherProvider {
        WeatherProvider::new("k", &server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_assemble_by_name_with_degraded_alerts() {
        let server = healthy_server().await;
        mount(&server, "/onecall", 500, serde_json::json!({"message": "boom"})).await;

        let snapshot = assemble_by_name(&provider(&server), "tokyo", TemperatureUnit::Celsius)
            .await
            .unwrap();

        assert_eq!(snapshot.resolved_name(), "Tokyo");
        assert_eq!(snapshot.air_quality.aqi, 3);
        assert!(snapshot.alerts.is_empty());
        assert_eq!(snapshot.unit, TemperatureUnit::Celsius);
    }

    #[tokio::test]
    async fn test_name_lookup_failure_is_not_found() {
        let server = MockServer::start().await;
        mount(&server, "/weather", 200, current_body()).await;
        mount(&server, "/forecast", 503, serde_json::json!({"message": "down"})).await;

        let err = assemble_by_name(&provider(&server), "Tokyo", TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::NotFound("Tokyo".into()));
    }

    #[tokio::test]
    async fn test_air_quality_failure_aborts() {
        let server = MockServer::start().await;
        mount(&server, "/weather", 200, current_body()).await;
        mount(&server, "/forecast", 200, serde_json::json!({"list": []})).await;
        mount(&server, "/air_pollution", 500, serde_json::json!({"message": "x"})).await;
        mount(&server, "/onecall", 200, serde_json::json!({})).await;

        let err = assemble_by_name(&provider(&server), "Tokyo", TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Provider {
                addressing: Addressing::Name,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_coords_failure_is_provider_error() {
        let server = MockServer::start().await;
        mount(&server, "/weather", 404, serde_json::json!({"message": "nothing"})).await;
        mount(&server, "/forecast", 200, serde_json::json!({"list": []})).await;

        let err = assemble_by_coords(
            &provider(&server),
            Coordinates::new(0.0, 0.0),
            TemperatureUnit::Fahrenheit,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Provider {
                addressing: Addressing::Coordinates,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_request_fetch_reports_generation() {
        let server = healthy_server().await;
        mount(&server, "/onecall", 200, serde_json::json!({})).await;
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        request_fetch(
            &tx,
            Arc::new(provider(&server)),
            7,
            Query::City("Tokyo".into()),
            TemperatureUnit::Celsius,
        );

        match rx.recv().await.unwrap() {
            WeatherServiceMessage::FetchDone {
                generation,
                query,
                result,
            } => {
                assert_eq!(generation, 7);
                assert_eq!(query, Query::City("Tokyo".into()));
                assert!(result.is_ok());
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_locate_fixed() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        request_locate(&tx, LocationSource::Fixed(Coordinates::new(1.5, 2.5)), 3);

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.generation(), 3);
        match msg {
            WeatherServiceMessage::LocationDone { result, .. } => {
                assert_eq!(result.unwrap().coordinates, Coordinates::new(1.5, 2.5));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }
}
