//! Fallback search across fields, layers and protocol versions.

use std::sync::Arc;

use metrics::counter;
use plot_common::{
    EntityQuery, EntityType, NormalizedFeature, PlotError, PlotResult, ServiceEndpoint,
};
use tracing::{debug, info, instrument, warn};
use wfs_protocol::{extract_features, GeometryNormalizer};

use crate::candidates::{search_plan, SearchConfig};
use crate::negotiator::ProtocolNegotiator;
use crate::transport::{ReqwestTransport, Transport};

/// Finds one parcel or building on one endpoint.
///
/// Candidates are tried strictly one after another in the order produced by
/// [`search_plan`]; the first record whose attributes contain the queried ID
/// wins and nothing further is requested. The engine keeps no state between
/// lookups, so one instance can serve concurrent queries.
#[derive(Clone)]
pub struct FallbackSearch {
    negotiator: ProtocolNegotiator,
    normalizer: GeometryNormalizer,
    config: Arc<SearchConfig>,
}

impl FallbackSearch {
    pub fn new(transport: Arc<dyn Transport>, config: SearchConfig) -> Self {
        Self {
            negotiator: ProtocolNegotiator::new(transport, config.policy.unfiltered_cap),
            normalizer: GeometryNormalizer::default(),
            config: Arc::new(config),
        }
    }

    /// Engine with the `reqwest` transport and the configured request timeout.
    pub fn with_http(config: SearchConfig) -> PlotResult<Self> {
        config.policy.validate()?;
        let transport = ReqwestTransport::new(config.policy.request_timeout())?;
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the full search; `None` once every combination is exhausted.
    #[instrument(skip(self, endpoint, query), fields(url = %endpoint.url, entity = %query.entity_type(), id = query.entity_id()))]
    pub async fn find(
        &self,
        endpoint: &ServiceEndpoint,
        query: &EntityQuery,
    ) -> Option<NormalizedFeature> {
        let entity_type = query.entity_type();
        let candidates = self.config.candidates(entity_type);
        let plan = search_plan(candidates, &self.config.policy);
        debug!(attempts = plan.len(), "Starting fallback search");

        for (n, attempt) in plan.iter().enumerate() {
            let Some(body) = self
                .negotiator
                .query(
                    endpoint,
                    attempt.layer,
                    attempt.version,
                    attempt.field,
                    query.entity_id(),
                )
                .await
            else {
                continue;
            };

            let records = match extract_features(&body) {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        layer = attempt.layer,
                        version = attempt.version,
                        error = %e,
                        "Unparseable GetFeature response"
                    );
                    continue;
                }
            };

            for record in records.iter().filter(|r| r.matches_id(query.entity_id())) {
                match self.normalizer.normalize_record(record) {
                    Ok(feature) => {
                        info!(
                            layer = attempt.layer,
                            version = attempt.version,
                            field = attempt.field,
                            attempt = n + 1,
                            "Feature found"
                        );
                        counter!("feature_lookups_total", "entity_type" => entity_type.as_str(), "outcome" => "found")
                            .increment(1);
                        return Some(feature);
                    }
                    Err(e) => {
                        warn!(layer = attempt.layer, error = %e, "Skipping record with malformed geometry");
                    }
                }
            }
        }

        info!(attempts = plan.len(), "Feature not found in any candidate");
        counter!("feature_lookups_total", "entity_type" => entity_type.as_str(), "outcome" => "not_found")
            .increment(1);
        None
    }

    /// Run the search under the configured deadline.
    ///
    /// Exhaustion becomes [`PlotError::NotFound`]; running out of time
    /// drops the in-flight request and yields [`PlotError::DeadlineExceeded`].
    pub async fn find_with_deadline(
        &self,
        endpoint: &ServiceEndpoint,
        query: &EntityQuery,
    ) -> PlotResult<NormalizedFeature> {
        let found = match self.config.policy.deadline() {
            Some(deadline) => match tokio::time::timeout(deadline, self.find(endpoint, query)).await {
                Ok(found) => found,
                Err(_) => {
                    warn!(id = query.entity_id(), ?deadline, "Lookup deadline exceeded");
                    counter!("feature_lookups_total", "entity_type" => query.entity_type().as_str(), "outcome" => "timeout")
                        .increment(1);
                    return Err(PlotError::DeadlineExceeded);
                }
            },
            None => self.find(endpoint, query).await,
        };

        found.ok_or_else(|| PlotError::NotFound {
            entity: query.entity_type().display_name().to_string(),
            id: query.entity_id().to_string(),
        })
    }

    /// Look up a parcel by its ID.
    pub async fn retrieve_parcel(
        &self,
        endpoint: &ServiceEndpoint,
        parcel_id: &str,
    ) -> PlotResult<NormalizedFeature> {
        self.find_with_deadline(endpoint, &EntityQuery::new(EntityType::Parcel, parcel_id))
            .await
    }

    /// Look up a building by its ID.
    pub async fn retrieve_building(
        &self,
        endpoint: &ServiceEndpoint,
        building_id: &str,
    ) -> PlotResult<NormalizedFeature> {
        self.find_with_deadline(endpoint, &EntityQuery::new(EntityType::Building, building_id))
            .await
    }
}
