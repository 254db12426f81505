//! Ellipsoidal Transverse Mercator projection.
//!
//! Both Polish national grids are Transverse Mercator projections of the
//! GRS80 ellipsoid (ETRS89 datum, which is treated as equal to WGS84 at the
//! accuracy cadastral exports need):
//!
//! - CS92 (EPSG:2180): central meridian 19°E, scale 0.9993,
//!   false easting 500 000 m, false northing -5 300 000 m
//! - CS2000 zones 5-8 (EPSG:2176-2179): central meridians 15/18/21/24°E,
//!   scale 0.999923, false easting zone * 1 000 000 + 500 000 m
//!
//! CS65 zone V (EPSG:2175) is the one Transverse Mercator zone of the legacy
//! grid, on the Krassowsky ellipsoid: central meridian 18°57'30", scale
//! 0.999983, false easting 237 000 m, false northing -4 700 000 m.
//!
//! The series are Krüger's n-series to fourth order (Karney 2011), accurate
//! to well under a millimetre inside the zones.

use std::f64::consts::PI;

use crate::datum::Ellipsoid;

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    /// First eccentricity
    e: f64,
    /// Rectifying radius
    big_a: f64,
    /// Forward series coefficients
    alpha: [f64; 4],
    /// Inverse series coefficients
    beta: [f64; 4],
    /// Conformal to geodetic latitude coefficients
    delta: [f64; 4],
}

impl TransverseMercator {
    /// Create a projection on the GRS80 ellipsoid.
    pub fn new(lon0_deg: f64, k0: f64, false_easting: f64, false_northing: f64) -> Self {
        Self::with_ellipsoid(Ellipsoid::GRS80, lon0_deg, k0, false_easting, false_northing)
    }

    pub fn with_ellipsoid(
        ellipsoid: Ellipsoid,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let f = ellipsoid.flattening();
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let big_a = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
            49561.0 * n4 / 161280.0,
        ];
        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
            4397.0 * n4 / 161280.0,
        ];
        let delta = [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
            56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
            4279.0 * n4 / 630.0,
        ];

        Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            e: (f * (2.0 - f)).sqrt(),
            big_a,
            alpha,
            beta,
            delta,
        }
    }

    /// Poland CS92 (EPSG:2180).
    pub fn cs92() -> Self {
        Self::new(19.0, 0.9993, 500_000.0, -5_300_000.0)
    }

    /// Poland CS2000 for zones 5 through 8 (EPSG:2176-2179).
    pub fn cs2000(zone: u8) -> Option<Self> {
        if !(5..=8).contains(&zone) {
            return None;
        }
        let lon0 = 3.0 * zone as f64;
        let false_easting = zone as f64 * 1_000_000.0 + 500_000.0;
        Some(Self::new(lon0, 0.999923, false_easting, 0.0))
    }

    /// Poland CS65 zone V (EPSG:2175), on Pulkovo 1942(58).
    pub fn cs65_zone5() -> Self {
        Self::with_ellipsoid(
            Ellipsoid::KRASSOWSKY,
            18.0 + 57.5 / 60.0,
            0.999983,
            237_000.0,
            -4_700_000.0,
        )
    }

    /// Project geographic coordinates (degrees) to (easting, northing) meters.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let lambda = normalize_angle(lon_deg.to_radians() - self.lon0);

        let sin_phi = phi.sin();
        let tau = (sin_phi.atanh() - self.e * (self.e * sin_phi).atanh()).sinh();
        let xi_p = tau.atan2(lambda.cos());
        let eta_p = (lambda.sin() / (1.0 + tau * tau).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        (
            self.false_easting + self.k0 * self.big_a * eta,
            self.false_northing + self.k0 * self.big_a * xi,
        )
    }

    /// Unproject (easting, northing) meters to (longitude, latitude) degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let xi = (northing - self.false_northing) / (self.k0 * self.big_a);
        let eta = (easting - self.false_easting) / (self.k0 * self.big_a);

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, d) in self.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            phi += d * (k * chi).sin();
        }

        let lambda = eta_p.sinh().atan2(xi_p.cos());

        ((self.lon0 + lambda).to_degrees(), phi.to_degrees())
    }
}

/// Normalize an angle difference to [-π, π].
fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
