//! Reference ellipsoids and the seven-parameter Helmert datum shift.
//!
//! ETRS89 (GRS80) is taken as equal to WGS84, so only the legacy CS65 grids,
//! which sit on Pulkovo 1942(58) and the Krassowsky ellipsoid, need a shift.

/// Arc-seconds to radians.
const ARC_SECOND: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// An oblate reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Inverse flattening
    pub inv_f: f64,
}

impl Ellipsoid {
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        inv_f: 298.257_222_101,
    };
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        inv_f: 298.257_223_563,
    };
    pub const KRASSOWSKY: Ellipsoid = Ellipsoid {
        a: 6_378_245.0,
        inv_f: 298.3,
    };

    pub fn flattening(&self) -> f64 {
        1.0 / self.inv_f
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Geodetic degrees (height zero) to geocentric cartesian meters.
    pub fn to_geocentric(&self, lon_deg: f64, lat_deg: f64) -> [f64; 3] {
        let (phi, lambda) = (lat_deg.to_radians(), lon_deg.to_radians());
        let e2 = self.e2();
        let nu = self.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        [
            nu * phi.cos() * lambda.cos(),
            nu * phi.cos() * lambda.sin(),
            nu * (1.0 - e2) * phi.sin(),
        ]
    }

    /// Geocentric cartesian meters to geodetic (longitude, latitude) degrees.
    pub fn from_geocentric(&self, [x, y, z]: [f64; 3]) -> (f64, f64) {
        let e2 = self.e2();
        let p = x.hypot(y);
        let mut phi = z.atan2(p * (1.0 - e2));
        for _ in 0..10 {
            let nu = self.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
            let h = p / phi.cos() - nu;
            phi = z.atan2(p * (1.0 - e2 * nu / (nu + h)));
        }
        (y.atan2(x).to_degrees(), phi.to_degrees())
    }
}

/// Position-vector Helmert transformation (EPSG method 9606).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helmert {
    /// Translations (meters)
    pub translation: [f64; 3],
    /// Rotations (arc-seconds)
    pub rotation: [f64; 3],
    /// Scale difference (parts per million)
    pub scale_ppm: f64,
}

impl Helmert {
    /// Pulkovo 1942(58) to WGS84 for Poland.
    pub const PULKOVO_1942_58: Helmert = Helmert {
        translation: [33.4, -146.6, -76.3],
        rotation: [-0.359, -0.053, 0.844],
        scale_ppm: -0.84,
    };

    /// Apply to geocentric coordinates.
    pub fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation.map(|r| r * ARC_SECOND);
        let m = 1.0 + self.scale_ppm * 1e-6;
        [
            m * (x - rz * y + ry * z) + tx,
            m * (rz * x + y - rx * z) + ty,
            m * (-ry * x + rx * y + z) + tz,
        ]
    }

    /// Shift geographic degrees on `from` to geographic degrees on WGS84.
    pub fn to_wgs84(&self, from: &Ellipsoid, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        Ellipsoid::WGS84.from_geocentric(self.apply(from.to_geocentric(lon_deg, lat_deg)))
    }
}
