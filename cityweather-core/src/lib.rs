//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Geocoding of a city name to coordinates
//! - Fetching the current weather and daily forecast for those coordinates
//! - The resolver that chains the two into one result
//! - Endpoint configuration persisted on disk
//!
//! HTTP goes through the [`HttpTransport`] trait so callers (and tests) can
//! supply their own client.

pub mod config;
pub mod error;
pub mod forecast;
pub mod geocoder;
pub mod model;
pub mod resolver;
pub mod transport;

pub use config::Config;
pub use error::{LookupError, Stage};
pub use forecast::WeatherFetcher;
pub use geocoder::Geocoder;
pub use model::{CityWeatherResult, Coordinates, WeatherPayload};
pub use resolver::CityWeatherResolver;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
