use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{LookupError, Stage};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET request. Swapped out in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get(&self, stage: Stage, url: &Url) -> Result<HttpResponse, LookupError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, stage: Stage, url: &Url) -> Result<HttpResponse, LookupError> {
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| LookupError::Request { stage, source })?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(|source| LookupError::Request { stage, source })?;

        Ok(HttpResponse { status, body })
    }
}

/// Joins a configured host root with a fixed API path.
pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<Url, LookupError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&raw).map_err(|source| LookupError::InvalidEndpoint { url: raw, source })
}
