//! OpenWeatherMap client.
//!
//! Every operation is a single GET; nothing is cached or retried here.

use std::time::Duration;

use tracing::instrument;
use wxdash_core::{TemperatureUnit, WeatherConfig};

use crate::error::WeatherError;
use crate::types::*;

/// One Call parts we never need; only `alerts` is left in the response.
const ALERTS_EXCLUDE: &str = "current,minutely,hourly,daily";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::new(
            &config.api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Current conditions for a free-text city name.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current_by_name(
        &self,
        name: &str,
        unit: TemperatureUnit,
    ) -> Result<CurrentWeather, WeatherError> {
        let query = format!("q={}&units={}", urlencoding::encode(name), unit.units_param());
        let api: ApiCurrentWeather = self.get("weather", &query).await?;
        Ok(CurrentWeather::from_api(api))
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current_by_coords(
        &self,
        coords: Coordinates,
        unit: TemperatureUnit,
    ) -> Result<CurrentWeather, WeatherError> {
        let query = format!("{}&units={}", coord_query(coords), unit.units_param());
        let api: ApiCurrentWeather = self.get("weather", &query).await?;
        Ok(CurrentWeather::from_api(api))
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast_by_name(
        &self,
        name: &str,
        unit: TemperatureUnit,
    ) -> Result<ForecastList, WeatherError> {
        let query = format!("q={}&units={}", urlencoding::encode(name), unit.units_param());
        let api: ApiForecast = self.get("forecast", &query).await?;
        Ok(ForecastList::from_api(api))
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast_by_coords(
        &self,
        coords: Coordinates,
        unit: TemperatureUnit,
    ) -> Result<ForecastList, WeatherError> {
        let query = format!("{}&units={}", coord_query(coords), unit.units_param());
        let api: ApiForecast = self.get("forecast", &query).await?;
        Ok(ForecastList::from_api(api))
    }

    /// Latest air-quality reading. Units do not apply.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_air_quality(
        &self,
        coords: Coordinates,
    ) -> Result<AirQualitySample, WeatherError> {
        let api: ApiAirQuality = self.get("air_pollution", &coord_query(coords)).await?;
        let item = api
            .list
            .into_iter()
            .next()
            .ok_or(WeatherError::EmptyResponse("air_pollution"))?;

        Ok(AirQualitySample {
            aqi: item.main.aqi,
            components: item.components,
        })
    }

    /// Active alerts for a location.
    ///
    /// Never fails: alerts are optional for most API plans, so any error is
    /// logged and reported as "no alerts".
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_alerts(&self, coords: Coordinates) -> Vec<WeatherAlert> {
        match self.try_fetch_alerts(coords).await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::warn!("Alerts unavailable, showing none: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_alerts(&self, coords: Coordinates) -> Result<Vec<WeatherAlert>, WeatherError> {
        let query = format!("{}&exclude={}", coord_query(coords), ALERTS_EXCLUDE);
        let api: ApiAlerts = self.get("onecall", &query).await?;
        Ok(api.alerts.into_iter().map(WeatherAlert::from).collect())
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &str,
    ) -> Result<T, WeatherError> {
        // The key is appended last so the logged form can simply omit it.
        tracing::debug!("GET {}/{}?{}", self.base_url, endpoint, query);
        let url = format!(
            "{}/{}?{}&appid={}",
            self.base_url,
            endpoint,
            query,
            urlencoding::encode(&self.api_key)
        );

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);

        match status.as_u16() {
            401 => Err(WeatherError::InvalidApiKey),
            404 => Err(WeatherError::NotFound(message)),
            code => Err(WeatherError::Api {
                status: code,
                message,
            }),
        }
    }
}

fn coord_query(coords: Coordinates) -> String {
    format!("lat={}&lon={}", coords.latitude, coords.longitude)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> WeatherProvider {
        WeatherProvider::new("test_key", &server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "coord": {"lat": 48.85, "lon": 2.35},
            "main": {"temp": 18.6, "feels_like": 18.1, "humidity": 64, "pressure": 1016},
            "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}],
            "wind": {"speed": 3.6},
            "name": "Paris",
            "sys": {"country": "FR", "sunrise": 1700031000, "sunset": 1700065000},
            "timezone": 3600
        })
    }

    #[tokio::test]
    async fn test_current_by_name_sends_query_and_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let current = provider(&mock_server)
            .fetch_current_by_name("Paris", TemperatureUnit::Celsius)
            .await
            .unwrap();

        assert_eq!(current.name, "Paris");
        assert_eq!(current.coordinates, Coordinates::new(48.85, 2.35));
        assert_eq!(current.condition.main, "Clear");
    }

    #[tokio::test]
    async fn test_city_name_is_url_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "São Paulo"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server)
            .fetch_current_by_name("São Paulo", TemperatureUnit::Fahrenheit)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_not_found_carries_provider_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .fetch_current_by_name("Atlantis", TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        match err {
            WeatherError::NotFound(message) => assert_eq!(message, "city not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_invalid_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .fetch_forecast_by_name("Paris", TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::InvalidApiKey));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .fetch_current_by_coords(Coordinates::new(1.0, 2.0), TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        match err {
            WeatherError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_forecast_by_coords() {
        let mock_server = MockServer::start().await;
        let list: Vec<serde_json::Value> = (0..40)
            .map(|i| {
                serde_json::json!({
                    "dt": 1700000000 + i * 10800,
                    "main": {"temp": i as f64},
                    "weather": [{"main": "Rain", "icon": "10d"}]
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "40.7"))
            .and(query_param("lon", "-74"))
            .and(query_param("units", "metric"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": list })),
            )
            .mount(&mock_server)
            .await;

        let forecast = provider(&mock_server)
            .fetch_forecast_by_coords(Coordinates::new(40.7, -74.0), TemperatureUnit::Celsius)
            .await
            .unwrap();

        assert_eq!(forecast.samples.len(), 40);
        assert_eq!(forecast.daily().len(), 5);
        assert_eq!(forecast.daily()[1].temperature, 8.0);
        assert_eq!(forecast.samples[0].condition.main, "Rain");
    }

    #[tokio::test]
    async fn test_air_quality_takes_first_entry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .and(query_param("lat", "1"))
            .and(query_param("lon", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [
                    {"main": {"aqi": 2}, "components": {"co": 230.3, "no2": 12.1, "o3": 40.0, "pm2_5": 8.2, "pm10": 11.0}},
                    {"main": {"aqi": 5}, "components": {"co": 1.0, "no2": 1.0, "o3": 1.0, "pm2_5": 1.0, "pm10": 1.0}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let sample = provider(&mock_server)
            .fetch_air_quality(Coordinates::new(1.0, 2.0))
            .await
            .unwrap();

        assert_eq!(sample.aqi, 2);
        assert_eq!(sample.components.pm2_5, 8.2);
    }

    #[tokio::test]
    async fn test_air_quality_empty_series() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .fetch_air_quality(Coordinates::new(1.0, 2.0))
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::EmptyResponse("air_pollution")));
    }

    #[tokio::test]
    async fn test_alerts_parsed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/onecall"))
            .and(query_param("exclude", "current,minutely,hourly,daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "alerts": [{
                    "sender_name": "NWS",
                    "event": "Flood Warning",
                    "start": 1700000000,
                    "end": 1700036000,
                    "description": "River flooding expected."
                }]
            })))
            .mount(&mock_server)
            .await;

        let alerts = provider(&mock_server)
            .fetch_alerts(Coordinates::new(1.0, 2.0))
            .await;

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event, "Flood Warning");
        assert_eq!(alerts[0].end.timestamp(), 1_700_036_000);
    }

    #[tokio::test]
    async fn test_alerts_failure_degrades_to_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Please note that using One Call requires a separate subscription."
            })))
            .mount(&mock_server)
            .await;

        let alerts = provider(&mock_server)
            .fetch_alerts(Coordinates::new(1.0, 2.0))
            .await;

        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_alerts_without_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"lat": 1.0, "lon": 2.0, "timezone": "UTC"})),
            )
            .mount(&mock_server)
            .await;

        let alerts = provider(&mock_server)
            .fetch_alerts(Coordinates::new(1.0, 2.0))
            .await;

        assert!(alerts.is_empty());
    }
}
