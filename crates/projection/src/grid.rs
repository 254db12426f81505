//! Grid-to-WGS84 unprojection for every supported projected CRS.

use plot_common::CrsCode;

use crate::datum::{Ellipsoid, Helmert};
use crate::stereographic::ObliqueStereographic;
use crate::transverse_mercator::TransverseMercator;

#[derive(Debug, Clone)]
enum Planar {
    TransverseMercator(TransverseMercator),
    Stereographic(ObliqueStereographic),
}

/// A projected grid and the datum shift from its ellipsoid to WGS84.
#[derive(Debug, Clone)]
pub struct GridProjection {
    planar: Planar,
    /// `None` for ETRS89 grids
    datum: Option<(Ellipsoid, Helmert)>,
}

impl GridProjection {
    /// Projection for a CRS code, or `None` for geographic systems.
    pub fn for_crs(crs: CrsCode) -> Option<Self> {
        if crs == CrsCode::Epsg2180 {
            return Some(Self::etrs89(TransverseMercator::cs92()));
        }
        if let Some(zone) = crs.cs2000_zone() {
            return TransverseMercator::cs2000(zone).map(Self::etrs89);
        }

        let planar = match crs.cs65_zone()? {
            5 => Planar::TransverseMercator(TransverseMercator::cs65_zone5()),
            zone => Planar::Stereographic(ObliqueStereographic::cs65(zone)?),
        };
        Some(Self {
            planar,
            datum: Some((Ellipsoid::KRASSOWSKY, Helmert::PULKOVO_1942_58)),
        })
    }

    fn etrs89(tm: TransverseMercator) -> Self {
        Self {
            planar: Planar::TransverseMercator(tm),
            datum: None,
        }
    }

    /// Unproject (easting, northing) meters to WGS84 (longitude, latitude).
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let (lon, lat) = match &self.planar {
            Planar::TransverseMercator(tm) => tm.inverse(easting, northing),
            Planar::Stereographic(st) => st.inverse(easting, northing),
        };
        match &self.datum {
            Some((ellipsoid, shift)) => shift.to_wgs84(ellipsoid, lon, lat),
            None => (lon, lat),
        }
    }
}
