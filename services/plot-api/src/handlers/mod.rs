//! HTTP request handlers.
//!
//! - `lookup`: parcel and building lookup, JSON or file download
//! - `landing`: service description
//! - `metrics`: health check and Prometheus metrics

pub mod landing;
pub mod lookup;
pub mod metrics;

pub use landing::landing_handler;
pub use lookup::{building_handler, parcel_handler, BuildingParams, ParcelParams};
pub use metrics::{health_handler, metrics_handler};
