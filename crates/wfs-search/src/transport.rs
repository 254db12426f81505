//! HTTP transport for WFS requests.

use std::time::Duration;

use async_trait::async_trait;
use plot_common::{PlotError, PlotResult};
use reqwest::Client;
use tracing::{debug, instrument};

/// Sends a GET request with query parameters and returns the body text.
///
/// Any non-success status is an error; implementations do not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, params: &[(&'static str, String)]) -> PlotResult<String>;
}

/// Production transport backed by `reqwest`.
///
/// Certificate validation is disabled: many county WFS endpoints serve
/// expired or self-signed certificates and are only reachable this way.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> PlotResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("plot-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlotError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, params), fields(url = %url))]
    async fn get(&self, url: &str, params: &[(&'static str, String)]) -> PlotResult<String> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| PlotError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlotError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PlotError::NetworkFailure(e.to_string()))?;
        debug!(bytes = body.len(), "Received WFS response");
        Ok(body)
    }
}
