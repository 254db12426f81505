//! OGC WFS protocol implementation.
//!
//! Supports:
//! - WFS 1.0.0, 1.1.0 and 2.0.0 GetFeature requests with equality filters
//! - GML 2, GML 3.1 and GML 3.2 feature collections
//! - Point, LineString and Polygon geometries in the Polish national grids
//!
//! Nothing here performs I/O; the HTTP side lives in `wfs-search`.

pub mod detect;
pub mod error;
pub mod exceptions;
pub mod features;
pub mod getfeature;
pub mod gml;
pub mod normalize;
pub mod xml;

pub use detect::{detect_crs, CrsDetection, DetectionSource};
pub use error::ParseError;
pub use exceptions::{exception_text, is_service_exception};
pub use features::{extract_features, is_geometry_tag};
pub use getfeature::{Dialect, GetFeatureRequest};
pub use gml::parse_geometry;
pub use normalize::GeometryNormalizer;
