//! GeoJSON geometry types for normalized features.
//!
//! Coordinates are `[longitude, latitude]` in WGS84 once a feature has been
//! normalized. See RFC 7946 section 3.1.

use serde::{Deserialize, Serialize};

/// A single position.
pub type Coord = [f64; 2];

/// GeoJSON geometry types produced by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A point geometry.
    Point {
        /// Coordinates as [longitude, latitude].
        coordinates: Coord,
    },

    /// A line string geometry.
    LineString {
        /// Array of [longitude, latitude] coordinate pairs.
        coordinates: Vec<Coord>,
    },

    /// A polygon geometry.
    Polygon {
        /// Array of linear rings (first is exterior, rest are holes).
        coordinates: Vec<Vec<Coord>>,
    },
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: [lon, lat],
        }
    }

    /// Create a line string geometry.
    pub fn line_string(coordinates: Vec<Coord>) -> Self {
        Geometry::LineString { coordinates }
    }

    /// Create a polygon geometry.
    pub fn polygon(coordinates: Vec<Vec<Coord>>) -> Self {
        Geometry::Polygon { coordinates }
    }

    /// GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
        }
    }

    /// All positions in document order (rings flattened).
    pub fn positions(&self) -> Vec<Coord> {
        match self {
            Geometry::Point { coordinates } => vec![*coordinates],
            Geometry::LineString { coordinates } => coordinates.clone(),
            Geometry::Polygon { coordinates } => coordinates.iter().flatten().copied().collect(),
        }
    }
}
