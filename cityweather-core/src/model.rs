use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A latitude/longitude pair as returned by the geocoding service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw forecast response, passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherPayload(pub Value);

impl WeatherPayload {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// The city as requested, where it was found, and the weather there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeatherResult {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: WeatherPayload,
}

impl CityWeatherResult {
    pub fn new(city: impl Into<String>, coords: Coordinates, weather: WeatherPayload) -> Self {
        Self {
            city: city.into(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            weather,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }
}
