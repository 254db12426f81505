//! Single GetFeature query with the unfiltered fallback.

use std::sync::Arc;

use metrics::counter;
use plot_common::{PlotError, PlotResult, ServiceEndpoint};
use tracing::{debug, instrument, warn};
use wfs_protocol::{exception_text, is_service_exception, GetFeatureRequest};

use crate::transport::Transport;

/// Queries one endpoint for one (layer, version, field = value) combination.
///
/// When the service answers the filtered request with an in-band exception
/// (unknown field, unsupported filter, ...) the same layer and version are
/// asked once more without a filter, capped at `unfiltered_cap` features.
/// Nothing else is retried.
#[derive(Clone)]
pub struct ProtocolNegotiator {
    transport: Arc<dyn Transport>,
    unfiltered_cap: u32,
}

impl ProtocolNegotiator {
    pub fn new(transport: Arc<dyn Transport>, unfiltered_cap: u32) -> Self {
        Self {
            transport,
            unfiltered_cap,
        }
    }

    /// Response body, or `None` if this combination failed.
    ///
    /// Failures are logged and counted, never propagated.
    #[instrument(skip(self, endpoint), fields(url = %endpoint.url))]
    pub async fn query(
        &self,
        endpoint: &ServiceEndpoint,
        layer: &str,
        version: &str,
        field: &str,
        value: &str,
    ) -> Option<String> {
        let request = GetFeatureRequest::filtered(version, layer, field, value);
        match self.query_with_retry(endpoint, &request).await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(error = %e, "Candidate failed");
                None
            }
        }
    }

    async fn query_with_retry(
        &self,
        endpoint: &ServiceEndpoint,
        request: &GetFeatureRequest,
    ) -> PlotResult<String> {
        let body = self.send(endpoint, request).await?;
        if !is_service_exception(&body) {
            return Ok(body);
        }

        counter!("wfs_service_exceptions_total").increment(1);
        warn!(
            layer = %request.type_name,
            version = %request.version,
            exception = exception_text(&body).as_deref().unwrap_or("<unreadable>"),
            "Service exception, retrying without filter"
        );

        let retry = request.without_filter(self.unfiltered_cap);
        let body = self.send(endpoint, &retry).await?;
        if is_service_exception(&body) {
            counter!("wfs_service_exceptions_total").increment(1);
            return Err(PlotError::ServiceException(format!(
                "{} ({}, {}): {}",
                endpoint.url,
                request.type_name,
                request.version,
                exception_text(&body).unwrap_or_default()
            )));
        }
        Ok(body)
    }

    async fn send(&self, endpoint: &ServiceEndpoint, request: &GetFeatureRequest) -> PlotResult<String> {
        let result = self.transport.get(&endpoint.url, &request.to_params()).await;
        let outcome = match &result {
            Ok(body) if is_service_exception(body) => "exception",
            Ok(_) => "ok",
            Err(PlotError::HttpStatus { .. }) => "http_error",
            Err(_) => "network_error",
        };
        counter!("wfs_requests_total", "outcome" => outcome).increment(1);

        if let Err(e) = &result {
            warn!(
                layer = %request.type_name,
                version = %request.version,
                error = %e,
                "WFS request failed"
            );
        }
        result
    }
}
