//! Coordinate transformation to WGS84 with a bounded fallback chain.
//!
//! Services frequently report coordinates without declaring their CRS, or
//! with the axes in an order that disagrees with the declaration. Every
//! transformed batch is validated against the plausible extent of the data
//! (Poland by default). Strategies are tried in this order:
//!
//! 1. [`Strategy::Declared`]: the detected CRS, axes as given
//! 2. [`Strategy::DeclaredSwapped`]: the detected CRS, axes swapped
//! 3. [`Strategy::Candidate`]: each national CRS in turn, testing only the
//!    first position in both axis orders, then re-projecting the batch
//! 4. [`Strategy::Untransformed`]: the input is returned unchanged
//!
//! The outcome of step 4 is not verified and callers should treat the
//! geometry as best-effort.

use plot_common::{AxisOrder, BoundingBox, Coord, CrsCode};
use tracing::{debug, warn};

use crate::grid::GridProjection;

/// The strategy that produced a [`TransformOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Source already geographic, or nothing to transform
    Identity,
    /// Detected CRS with the axis order as given
    Declared(CrsCode),
    /// Detected CRS with easting and northing swapped
    DeclaredSwapped(CrsCode),
    /// Another national CRS whose projection of the first position validated
    Candidate { crs: CrsCode, axis_order: AxisOrder },
    /// Nothing validated; coordinates returned as received
    Untransformed,
}

/// Transformed coordinates and how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    pub coords: Vec<Coord>,
    pub strategy: Strategy,
}

impl TransformOutcome {
    /// Whether the coordinates are known to be geographic WGS84.
    pub fn is_verified(&self) -> bool {
        !matches!(self.strategy, Strategy::Untransformed)
    }
}

/// Projects national grid coordinates to WGS84 longitude/latitude.
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    /// Lon/lat rectangle a transformed position must fall inside
    pub valid_area: BoundingBox,
    /// National systems tried when the detected one does not validate.
    /// The legacy CS65 zones are only used when declared.
    pub candidates: Vec<CrsCode>,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self {
            valid_area: BoundingBox::POLAND,
            candidates: CrsCode::NATIONAL.to_vec(),
        }
    }
}

impl CoordinateTransformer {
    pub fn new(valid_area: BoundingBox, candidates: Vec<CrsCode>) -> Self {
        Self {
            valid_area,
            candidates,
        }
    }

    /// Transform a batch of (easting, northing) pairs from `source` to WGS84.
    pub fn transform(&self, coords: &[Coord], source: CrsCode) -> TransformOutcome {
        if coords.is_empty() || source.is_geographic() {
            return TransformOutcome {
                coords: coords.to_vec(),
                strategy: Strategy::Identity,
            };
        }

        if let Some(out) = self.try_declared(coords, source, AxisOrder::EastingNorthing) {
            return TransformOutcome {
                coords: out,
                strategy: Strategy::Declared(source),
            };
        }

        if let Some(out) = self.try_declared(coords, source, AxisOrder::NorthingEasting) {
            debug!(crs = %source, "Coordinates validated with swapped axes");
            return TransformOutcome {
                coords: out,
                strategy: Strategy::DeclaredSwapped(source),
            };
        }

        for &crs in &self.candidates {
            if let Some((axis_order, out)) = self.try_candidate(coords, crs) {
                debug!(detected = %source, used = %crs, ?axis_order, "Fell back to candidate CRS");
                return TransformOutcome {
                    coords: out,
                    strategy: Strategy::Candidate { crs, axis_order },
                };
            }
        }

        warn!(
            crs = %source,
            first = ?coords[0],
            "No CRS produced coordinates inside the valid area, returning input unchanged"
        );
        TransformOutcome {
            coords: coords.to_vec(),
            strategy: Strategy::Untransformed,
        }
    }

    /// Project every pair under `crs`; `None` unless all land in the valid area.
    pub fn try_declared(
        &self,
        coords: &[Coord],
        crs: CrsCode,
        axis_order: AxisOrder,
    ) -> Option<Vec<Coord>> {
        let proj = GridProjection::for_crs(crs)?;
        let out = project_all(&proj, coords, axis_order);
        out.iter()
            .all(|c| self.is_valid(c))
            .then_some(out)
    }

    /// Test the first pair under `crs` in both axis orders; on success
    /// re-project the whole batch with the order that validated.
    pub fn try_candidate(&self, coords: &[Coord], crs: CrsCode) -> Option<(AxisOrder, Vec<Coord>)> {
        let proj = GridProjection::for_crs(crs)?;
        let first = *coords.first()?;

        [AxisOrder::EastingNorthing, AxisOrder::NorthingEasting]
            .into_iter()
            .find(|&order| {
                let (e, n) = order.easting_northing(first);
                let (lon, lat) = proj.inverse(e, n);
                self.is_valid(&[lon, lat])
            })
            .map(|order| (order, project_all(&proj, coords, order)))
    }

    fn is_valid(&self, c: &Coord) -> bool {
        c[0].is_finite() && c[1].is_finite() && self.valid_area.contains_point(c[0], c[1])
    }
}

fn project_all(proj: &GridProjection, coords: &[Coord], axis_order: AxisOrder) -> Vec<Coord> {
    coords
        .iter()
        .map(|&pair| {
            let (e, n) = axis_order.easting_northing(pair);
            let (lon, lat) = proj.inverse(e, n);
            [lon, lat]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const WARSAW_CS92: Coord = [637_382.204, 486_757.209];
    const WARSAW_CS2000_Z7: Coord = [7_500_833.512, 5_788_456.487];

    #[test]
    fn test_declared_cs92() {
        let t = CoordinateTransformer::default();
        let out = t.transform(&[WARSAW_CS92], CrsCode::Epsg2180);
        assert_eq!(out.strategy, Strategy::Declared(CrsCode::Epsg2180));
        assert_abs_diff_eq!(out.coords[0][0], 21.0122, epsilon = 1e-4);
        assert_abs_diff_eq!(out.coords[0][1], 52.2297, epsilon = 1e-4);
    }

    #[test]
    fn test_geographic_is_identity() {
        let t = CoordinateTransformer::default();
        let input = [[21.0122, 52.2297], [21.0130, 52.2301]];
        let out = t.transform(&input, CrsCode::Epsg4326);
        assert_eq!(out.strategy, Strategy::Identity);
        assert_eq!(out.coords, input.to_vec());
    }

    #[test]
    fn test_empty_is_identity() {
        let t = CoordinateTransformer::default();
        let out = t.transform(&[], CrsCode::Epsg2180);
        assert!(out.coords.is_empty());
        assert_eq!(out.strategy, Strategy::Identity);
    }

    #[test]
    fn test_swapped_axes_accepted() {
        let t = CoordinateTransformer::default();
        // Zone 7 given northing first: as-given fails, swapped validates.
        let input = [[WARSAW_CS2000_Z7[1], WARSAW_CS2000_Z7[0]]];
        let out = t.transform(&input, CrsCode::Epsg2178);
        assert_eq!(out.strategy, Strategy::DeclaredSwapped(CrsCode::Epsg2178));
        assert_abs_diff_eq!(out.coords[0][0], 21.0122, epsilon = 1e-4);
        assert_abs_diff_eq!(out.coords[0][1], 52.2297, epsilon = 1e-4);
    }

    #[test]
    fn test_candidate_fallback_when_detection_wrong() {
        let t = CoordinateTransformer::default();
        // Zone 7 coordinates misdetected as CS92.
        let out = t.transform(&[WARSAW_CS2000_Z7], CrsCode::Epsg2180);
        assert_eq!(
            out.strategy,
            Strategy::Candidate {
                crs: CrsCode::Epsg2178,
                axis_order: AxisOrder::EastingNorthing
            }
        );
        assert_abs_diff_eq!(out.coords[0][0], 21.0122, epsilon = 1e-4);
        assert!(out.is_verified());
    }

    #[test]
    fn test_escape_hatch_returns_input() {
        let t = CoordinateTransformer::default();
        let input = [[1.0e9, 1.0e9], [1.1e9, 1.0e9]];
        let out = t.transform(&input, CrsCode::Epsg2180);
        assert_eq!(out.strategy, Strategy::Untransformed);
        assert_eq!(out.coords, input.to_vec());
        assert!(!out.is_verified());
    }

    #[test]
    fn test_declared_cs65_zone1_northing_first() {
        let t = CoordinateTransformer::default();
        let out = t.transform(&[[5_500_000.0, 4_600_000.0]], CrsCode::Epsg3120);
        assert_eq!(out.strategy, Strategy::DeclaredSwapped(CrsCode::Epsg3120));
        assert_abs_diff_eq!(out.coords[0][0], 20.555_289, epsilon = 1e-6);
        assert_abs_diff_eq!(out.coords[0][1], 50.920_227, epsilon = 1e-6);
    }

    #[test]
    fn test_try_candidate_only_checks_first_position() {
        let t = CoordinateTransformer::default();
        let input = [WARSAW_CS92, [1.0e9, 1.0e9]];
        assert!(t.try_declared(&input, CrsCode::Epsg2180, AxisOrder::EastingNorthing).is_none());
        let (order, out) = t.try_candidate(&input, CrsCode::Epsg2180).unwrap();
        assert_eq!(order, AxisOrder::EastingNorthing);
        assert_eq!(out.len(), 2);
    }
}
