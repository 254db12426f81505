//! Coordinate reference system transformations.
//!
//! Implements the Polish national grids (CS92, CS2000 and the legacy CS65
//! zones with their Pulkovo datum shift) from scratch without external
//! dependencies, and the fallback chain that turns coordinates of uncertain
//! origin into WGS84 longitude/latitude.

pub mod datum;
pub mod grid;
pub mod stereographic;
pub mod transform;
pub mod transverse_mercator;

pub use datum::{Ellipsoid, Helmert};
pub use grid::GridProjection;
pub use stereographic::ObliqueStereographic;
pub use transform::{CoordinateTransformer, Strategy, TransformOutcome};
pub use transverse_mercator::TransverseMercator;
