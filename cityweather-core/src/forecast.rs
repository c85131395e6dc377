use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    error::{LookupError, Stage, truncate_body},
    model::WeatherPayload,
    transport::{HttpTransport, endpoint_url},
};

pub const FORECAST_PATH: &str = "/v1/forecast";

const CURRENT_FIELDS: &str = "relativehumidity_2m,surface_pressure";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

/// Fetches current conditions and the daily forecast for a coordinate pair.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    transport: Arc<dyn HttpTransport>,
    forecast_url: Url,
}

impl WeatherFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: &str) -> Result<Self, LookupError> {
        let forecast_url = endpoint_url(base_url, FORECAST_PATH)?;
        Ok(Self { transport, forecast_url })
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> Url {
        let mut url = self.forecast_url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("current_weather", "true")
            .append_pair("current", CURRENT_FIELDS)
            .append_pair("daily", DAILY_FIELDS)
            .append_pair("timezone", "auto");
        url
    }

    /// Returns the forecast response body exactly as the service sent it.
    ///
    /// Coordinates go out unchecked; the remote service decides what it accepts.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    pub async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherPayload, LookupError> {
        let url = self.forecast_url(latitude, longitude);
        debug!(url = %url, "Fetching forecast");

        let res = self.transport.get(Stage::Forecast, &url).await?;

        if !res.is_success() {
            debug!(status = res.status, "Forecast request rejected");
            return Err(LookupError::Transport {
                stage: Stage::Forecast,
                status: res.status,
                body: truncate_body(&res.body),
            });
        }

        let value: Value = serde_json::from_str(&res.body)
            .map_err(|source| LookupError::Parse { stage: Stage::Forecast, source })?;

        Ok(WeatherPayload(value))
    }
}
