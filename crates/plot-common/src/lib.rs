//! Common types shared across the plot-api crates.

pub mod bbox;
pub mod crs;
pub mod entity;
pub mod error;
pub mod geometry;

pub use bbox::BoundingBox;
pub use crs::{AxisOrder, CrsCode};
pub use entity::{EntityQuery, EntityType, NormalizedFeature, RawFeatureRecord, ServiceEndpoint};
pub use error::{PlotError, PlotResult};
pub use geometry::{Coord, Geometry};
