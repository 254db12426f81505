//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are lon/lat degrees.
/// For projected CRS (EPSG:2180, etc.), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Plausible lon/lat extent of Poland, with a margin for border parcels.
    pub const POLAND: BoundingBox = BoundingBox {
        min_x: 13.5,
        min_y: 48.5,
        max_x: 24.5,
        max_y: 55.5,
    };

    /// Valid range of geographic coordinates.
    pub const WORLD: BoundingBox = BoundingBox {
        min_x: -180.0,
        min_y: -90.0,
        max_x: 180.0,
        max_y: 90.0,
    };

    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box enclosing every pair, or `None` for no pairs.
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a [f64; 2]>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox::new(first[0], first[1], first[0], first[1]);
        for c in iter {
            bbox.min_x = bbox.min_x.min(c[0]);
            bbox.min_y = bbox.min_y.min(c[1]);
            bbox.max_x = bbox.max_x.max(c[0]);
            bbox.max_y = bbox.max_y.max(c[1]);
        }
        Some(bbox)
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}
