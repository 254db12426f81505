//! Plot API service library.
//!
//! HTTP routing for parcel and building lookup over municipal WFS services.
//! The binary in `main.rs` only parses arguments, sets up tracing and
//! metrics, and serves [`router`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod state;

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>, prometheus: PrometheusHandle) -> Router {
    Router::new()
        .route("/", get(handlers::landing_handler))
        // Lookup endpoints
        .route("/api/parcel_by_id", get(handlers::parcel_handler))
        .route("/api/parcel_by_id/", get(handlers::parcel_handler))
        .route("/api/building_by_id", get(handlers::building_handler))
        .route("/api/building_by_id/", get(handlers::building_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
