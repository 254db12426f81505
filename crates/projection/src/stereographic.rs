//! Oblique stereographic projection (EPSG method 9809, "double stereographic").
//!
//! The ellipsoid is first mapped conformally onto a sphere of radius
//! `sqrt(rho0 * nu0)`, which is then projected stereographically from the
//! origin. Zones I-IV of the legacy Polish CS65 grid use it on the
//! Krassowsky ellipsoid:
//!
//! | Zone | EPSG | Origin latitude | Origin longitude | False E / N (m)       |
//! |------|------|-----------------|------------------|-----------------------|
//! | I    | 3120 | 50°37'30"       | 21°05'00"        | 4 637 000 / 5 467 000 |
//! | II   | 2172 | 53°00'07"       | 21°30'10"        | 4 603 000 / 5 806 000 |
//! | III  | 2173 | 53°35'00"       | 17°00'30"        | 3 501 000 / 5 999 000 |
//! | IV   | 2174 | 51°40'15"       | 16°40'20"        | 3 703 000 / 5 627 000 |
//!
//! All four share the scale factor 0.9998.

use std::f64::consts::FRAC_PI_4;

use crate::datum::Ellipsoid;

const CS65_SCALE: f64 = 0.9998;

/// Oblique stereographic projection parameters.
#[derive(Debug, Clone)]
pub struct ObliqueStereographic {
    /// Origin longitude in radians
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    e2: f64,
    /// Radius of the conformal sphere
    radius: f64,
    n: f64,
    c: f64,
    /// Conformal latitude of the origin
    chi0: f64,
}

fn dms(deg: f64, min: f64, sec: f64) -> f64 {
    deg + min / 60.0 + sec / 3600.0
}

impl ObliqueStereographic {
    pub fn new(
        ellipsoid: Ellipsoid,
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let e2 = ellipsoid.e2();
        let e = e2.sqrt();
        let phi0 = lat0_deg.to_radians();
        let sin0 = phi0.sin();

        let w = 1.0 - e2 * sin0 * sin0;
        let rho0 = ellipsoid.a * (1.0 - e2) / w.powf(1.5);
        let nu0 = ellipsoid.a / w.sqrt();
        let n = (1.0 + e2 * phi0.cos().powi(4) / (1.0 - e2)).sqrt();

        let s1 = (1.0 + sin0) / (1.0 - sin0);
        let s2 = (1.0 - e * sin0) / (1.0 + e * sin0);
        let w1 = (s1 * s2.powf(e)).powf(n);
        let sin_chi00 = (w1 - 1.0) / (w1 + 1.0);
        let c = (n + sin0) * (1.0 - sin_chi00) / ((n - sin0) * (1.0 + sin_chi00));
        let w2 = c * w1;

        Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            e,
            e2,
            radius: (rho0 * nu0).sqrt(),
            n,
            c,
            chi0: ((w2 - 1.0) / (w2 + 1.0)).asin(),
        }
    }

    /// CS65 zones I through IV (EPSG:3120, 2172-2174), on Pulkovo 1942(58).
    pub fn cs65(zone: u8) -> Option<Self> {
        let (lat0, lon0, fe, fn_) = match zone {
            1 => (dms(50.0, 37.0, 30.0), dms(21.0, 5.0, 0.0), 4_637_000.0, 5_467_000.0),
            2 => (dms(53.0, 0.0, 7.0), dms(21.0, 30.0, 10.0), 4_603_000.0, 5_806_000.0),
            3 => (dms(53.0, 35.0, 0.0), dms(17.0, 0.0, 30.0), 3_501_000.0, 5_999_000.0),
            4 => (dms(51.0, 40.0, 15.0), dms(16.0, 40.0, 20.0), 3_703_000.0, 5_627_000.0),
            _ => return None,
        };
        Some(Self::new(Ellipsoid::KRASSOWSKY, lat0, lon0, CS65_SCALE, fe, fn_))
    }

    /// Project geographic degrees to (easting, northing) meters.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let sin_phi = lat_deg.to_radians().sin();
        let d_lambda = self.n * (lon_deg.to_radians() - self.lon0);

        let sa = (1.0 + sin_phi) / (1.0 - sin_phi);
        let sb = (1.0 - self.e * sin_phi) / (1.0 + self.e * sin_phi);
        let w = self.c * (sa * sb.powf(self.e)).powf(self.n);
        let chi = ((w - 1.0) / (w + 1.0)).asin();

        let b = 1.0 + chi.sin() * self.chi0.sin() + chi.cos() * self.chi0.cos() * d_lambda.cos();
        let k = 2.0 * self.radius * self.k0;
        (
            self.false_easting + k * chi.cos() * d_lambda.sin() / b,
            self.false_northing
                + k * (chi.sin() * self.chi0.cos() - chi.cos() * self.chi0.sin() * d_lambda.cos())
                    / b,
        )
    }

    /// Unproject (easting, northing) meters to (longitude, latitude) degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let k = 2.0 * self.radius * self.k0;
        let x = easting - self.false_easting;
        let y = northing - self.false_northing;

        let g = k * (FRAC_PI_4 - self.chi0 / 2.0).tan();
        let h = 2.0 * k * self.chi0.tan() + g;
        let i = (x / (h + y)).atan();
        let j = (x / (g - y)).atan() - i;
        let chi = self.chi0 + 2.0 * ((y - x * (j / 2.0).tan()) / k).atan();
        let lambda = self.lon0 + (j + 2.0 * i) / self.n;

        // Isometric latitude, then geodetic latitude by Newton iteration.
        let psi = 0.5 * ((1.0 + chi.sin()) / (self.c * (1.0 - chi.sin()))).ln() / self.n;
        let mut phi = 2.0 * psi.exp().atan() - 2.0 * FRAC_PI_4;
        for _ in 0..15 {
            let es = self.e * phi.sin();
            let psi_i = ((phi / 2.0 + FRAC_PI_4).tan() * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).ln();
            let step = (psi_i - psi) * phi.cos() * (1.0 - es * es) / (1.0 - self.e2);
            phi -= step;
            if step.abs() < 1e-14 {
                break;
            }
        }

        (lambda.to_degrees(), phi.to_degrees())
    }
}
