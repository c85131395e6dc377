use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::LookupError,
    forecast::WeatherFetcher,
    geocoder::Geocoder,
    model::CityWeatherResult,
    transport::{HttpTransport, ReqwestTransport},
};

/// Geocodes a city, then fetches the weather at the coordinates found.
#[derive(Debug, Clone)]
pub struct CityWeatherResolver {
    geocoder: Geocoder,
    fetcher: WeatherFetcher,
}

impl CityWeatherResolver {
    pub fn new(geocoder: Geocoder, fetcher: WeatherFetcher) -> Self {
        Self { geocoder, fetcher }
    }

    /// Builds both clients over one shared transport.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        geocoding_url: &str,
        forecast_url: &str,
    ) -> Result<Self, LookupError> {
        let geocoder = Geocoder::new(transport.clone(), geocoding_url)?;
        let fetcher = WeatherFetcher::new(transport, forecast_url)?;
        Ok(Self::new(geocoder, fetcher))
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = match config.timeout() {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)
                .context("Failed to build HTTP client")?,
            None => ReqwestTransport::new(),
        };

        let resolver =
            Self::with_transport(Arc::new(transport), &config.geocoding_url, &config.forecast_url)?;
        Ok(resolver)
    }

    /// Resolves `city` and fetches its weather.
    ///
    /// The two calls run one after the other. A geocoding failure is returned as-is
    /// and the forecast service is never contacted; a forecast failure discards the
    /// coordinates already found.
    #[instrument(skip(self))]
    pub async fn resolve_city_weather(&self, city: &str) -> Result<CityWeatherResult, LookupError> {
        let coords = self.geocoder.resolve_coordinates(city).await?;
        debug!(lat = coords.latitude, lon = coords.longitude, "City resolved");

        let weather = self.fetcher.fetch_weather(coords.latitude, coords.longitude).await?;

        Ok(CityWeatherResult::new(city, coords, weather))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Stage, forecast::FORECAST_PATH, geocoder::SEARCH_PATH, model::Coordinates,
        transport::stub::StubTransport,
    };
    use serde_json::json;

    fn resolver(stub: StubTransport) -> (CityWeatherResolver, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        let resolver =
            CityWeatherResolver::with_transport(stub.clone(), "https://geo.test", "https://wx.test")
                .expect("valid base urls");
        (resolver, stub)
    }

    #[tokio::test]
    async fn merges_city_coordinates_and_weather() {
        let (resolver, stub) = resolver(
            StubTransport::new()
                .respond(SEARCH_PATH, 200, r#"{"results":[{"latitude":48.85,"longitude":2.35}]}"#)
                .respond(FORECAST_PATH, 200, r#"{"current_weather":{"temperature":20}}"#),
        );

        let result = resolver.resolve_city_weather("Paris").await.unwrap();

        assert_eq!(result.city, "Paris");
        assert_eq!(result.coordinates(), Coordinates { latitude: 48.85, longitude: 2.35 });
        assert_eq!(result.weather.as_value(), &json!({"current_weather": {"temperature": 20}}));

        let requests = stub.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].host_str(), Some("geo.test"));
        assert_eq!(requests[1].host_str(), Some("wx.test"));
        assert!(requests[1].as_str().contains("latitude=48.85&longitude=2.35"));
    }

    #[tokio::test]
    async fn city_is_echoed_as_given() {
        let (resolver, _) = resolver(
            StubTransport::new()
                .respond(SEARCH_PATH, 200, r#"{"results":[{"latitude":1.5,"longitude":2.5}]}"#)
                .respond(FORECAST_PATH, 200, "{}"),
        );

        let result = resolver.resolve_city_weather("  zürich ").await.unwrap();
        assert_eq!(result.city, "  zürich ");
    }

    #[tokio::test]
    async fn not_found_short_circuits_before_forecast() {
        let (resolver, stub) = resolver(
            StubTransport::new()
                .respond(SEARCH_PATH, 200, r#"{"results":[]}"#)
                .respond(FORECAST_PATH, 200, "{}"),
        );

        let err = resolver.resolve_city_weather("Atlantis").await.unwrap_err();

        assert!(matches!(err, LookupError::NotFound { .. }));
        assert_eq!(stub.requests_to(FORECAST_PATH), 0);
    }

    #[tokio::test]
    async fn geocoding_status_error_short_circuits() {
        let (resolver, stub) = resolver(
            StubTransport::new()
                .respond(SEARCH_PATH, 500, "Internal Server Error")
                .respond(FORECAST_PATH, 200, "{}"),
        );

        let err = resolver.resolve_city_weather("Paris").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.stage(), Some(Stage::Geocoding));
        assert_eq!(stub.requests_to(FORECAST_PATH), 0);
    }

    #[tokio::test]
    async fn forecast_failure_surfaces_without_coordinates() {
        let (resolver, _) = resolver(
            StubTransport::new()
                .respond(SEARCH_PATH, 200, r#"{"results":[{"latitude":48.85,"longitude":2.35}]}"#)
                .respond(FORECAST_PATH, 503, "Service Unavailable"),
        );

        let err = resolver.resolve_city_weather("Paris").await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert_eq!(err.stage(), Some(Stage::Forecast));
        let rendered = format!("{err} {err:?}");
        assert!(!rendered.contains("48.85"));
        assert!(!rendered.contains("2.35"));
    }

    #[tokio::test]
    async fn forecast_parse_error_propagates() {
        let (resolver, _) = resolver(
            StubTransport::new()
                .respond(SEARCH_PATH, 200, r#"{"results":[{"latitude":1.0,"longitude":1.0}]}"#)
                .respond(FORECAST_PATH, 200, "<html>"),
        );

        let err = resolver.resolve_city_weather("Paris").await.unwrap_err();
        assert!(matches!(err, LookupError::Parse { stage: Stage::Forecast, .. }));
    }

    #[test]
    fn from_config_rejects_invalid_endpoint() {
        let cfg = Config { geocoding_url: "::nope::".into(), ..Config::default() };

        let err = CityWeatherResolver::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint URL"));
    }

    #[test]
    fn from_config_accepts_defaults_and_timeout() {
        assert!(CityWeatherResolver::from_config(&Config::default()).is_ok());

        let cfg = Config { timeout_secs: Some(5), ..Config::default() };
        assert!(CityWeatherResolver::from_config(&cfg).is_ok());
    }
}
