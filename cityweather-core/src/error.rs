use std::fmt;

use thiserror::Error;

/// Which of the two remote calls an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Geocoding,
    Forecast,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Geocoding => "geocoding",
            Stage::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while resolving a city to its weather.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The geocoding service returned no matches for the city.
    #[error("City not found: '{city}'")]
    NotFound { city: String },

    /// A response body was not the structured data we expected.
    #[error("Failed to parse {stage} data")]
    Parse {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    /// The remote service answered with a non-success status.
    #[error("{stage} request failed with status {status}: {body}")]
    Transport { stage: Stage, status: u16, body: String },

    /// The request never produced a response (DNS, connect, TLS, timeout, body read).
    #[error("Failed to send {stage} request")]
    Request {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid endpoint URL '{url}'")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl LookupError {
    /// HTTP status carried by a [`LookupError::Transport`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            LookupError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The remote call this error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            LookupError::NotFound { .. } => Some(Stage::Geocoding),
            LookupError::Parse { stage, .. }
            | LookupError::Transport { stage, .. }
            | LookupError::Request { stage, .. } => Some(*stage),
            LookupError::InvalidEndpoint { .. } => None,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
