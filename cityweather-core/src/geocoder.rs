use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    error::{LookupError, Stage, truncate_body},
    model::Coordinates,
    transport::{HttpTransport, endpoint_url},
};

pub const SEARCH_PATH: &str = "/v1/search";

const LANGUAGE: &str = "en";
const FORMAT: &str = "json";

/// Resolves a city name to coordinates using an Open-Meteo style geocoding API.
#[derive(Debug, Clone)]
pub struct Geocoder {
    transport: Arc<dyn HttpTransport>,
    search_url: Url,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
}

impl Geocoder {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: &str) -> Result<Self, LookupError> {
        let search_url = endpoint_url(base_url, SEARCH_PATH)?;
        Ok(Self { transport, search_url })
    }

    fn search_url(&self, city: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("name", city)
            .append_pair("language", LANGUAGE)
            .append_pair("format", FORMAT);
        url
    }

    /// Looks up `city` and returns the first match.
    ///
    /// The name is sent as given (only URL-encoded). When the service knows several
    /// places with that name, whichever it lists first wins.
    #[instrument(skip(self))]
    pub async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates, LookupError> {
        let url = self.search_url(city);
        debug!(url = %url, "Geocoding city");

        let res = self.transport.get(Stage::Geocoding, &url).await?;

        if !res.is_success() {
            debug!(status = res.status, "Geocoding request rejected");
            return Err(LookupError::Transport {
                stage: Stage::Geocoding,
                status: res.status,
                body: truncate_body(&res.body),
            });
        }

        let parsed: Value = serde_json::from_str(&res.body)
            .map_err(|source| LookupError::Parse { stage: Stage::Geocoding, source })?;

        // Only the first entry is decoded; later ones are never looked at.
        let first = parsed
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .ok_or_else(|| LookupError::NotFound { city: city.to_string() })?;

        let first = GeoResult::deserialize(first)
            .map_err(|source| LookupError::Parse { stage: Stage::Geocoding, source })?;

        Ok(Coordinates { latitude: first.latitude, longitude: first.longitude })
    }
}
