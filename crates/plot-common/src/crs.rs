//! Coordinate Reference System identifiers for Polish cadastral data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CRS codes recognized in WFS responses from Polish cadastral services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (degrees)
    Epsg4326,
    /// ETRS89 / Poland CS92 (meters), the primary national grid
    Epsg2180,
    /// ETRS89 / Poland CS2000 zone 5, central meridian 15°E
    Epsg2176,
    /// ETRS89 / Poland CS2000 zone 6, central meridian 18°E
    Epsg2177,
    /// ETRS89 / Poland CS2000 zone 7, central meridian 21°E
    Epsg2178,
    /// ETRS89 / Poland CS2000 zone 8, central meridian 24°E
    Epsg2179,
    /// Pulkovo 1942(58) / Poland zone I (CS65), oblique stereographic
    Epsg3120,
    /// Pulkovo 1942(58) / Poland zone II (CS65), oblique stereographic
    Epsg2172,
    /// Pulkovo 1942(58) / Poland zone III (CS65), oblique stereographic
    Epsg2173,
    /// Pulkovo 1942(58) / Poland zone IV (CS65), oblique stereographic
    Epsg2174,
    /// Pulkovo 1942(58) / Poland zone V (CS65), Transverse Mercator
    Epsg2175,
}

impl CrsCode {
    /// The primary national projection, used when detection is inconclusive.
    pub const PRIMARY: CrsCode = CrsCode::Epsg2180;

    /// National projected systems in the order they are tried as a fallback.
    pub const NATIONAL: [CrsCode; 5] = [
        CrsCode::Epsg2180,
        CrsCode::Epsg2176,
        CrsCode::Epsg2177,
        CrsCode::Epsg2178,
        CrsCode::Epsg2179,
    ];

    /// Map a numeric EPSG code to a known CRS.
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 | 4258 => Some(CrsCode::Epsg4326),
            2180 => Some(CrsCode::Epsg2180),
            2176 => Some(CrsCode::Epsg2176),
            2177 => Some(CrsCode::Epsg2177),
            2178 => Some(CrsCode::Epsg2178),
            2179 => Some(CrsCode::Epsg2179),
            3120 => Some(CrsCode::Epsg3120),
            2172 => Some(CrsCode::Epsg2172),
            2173 => Some(CrsCode::Epsg2173),
            2174 => Some(CrsCode::Epsg2174),
            2175 => Some(CrsCode::Epsg2175),
            _ => None,
        }
    }

    /// Parse an `srsName` attribute value.
    ///
    /// Accepts the spellings seen in GML from WFS 1.0 through 2.0:
    /// - "EPSG:2180"
    /// - "urn:ogc:def:crs:EPSG::2180" (and versioned "urn:ogc:def:crs:EPSG:6.9:2180")
    /// - "urn:x-ogc:def:crs:EPSG:2180"
    /// - "http://www.opengis.net/gml/srs/epsg.xml#2180"
    /// - "http://www.opengis.net/def/crs/EPSG/0/2180"
    /// - "CRS:84" / "urn:ogc:def:crs:OGC:1.3:CRS84"
    pub fn from_srs_name(srs_name: &str) -> Option<Self> {
        let normalized = srs_name.trim().to_uppercase();
        if normalized.ends_with("CRS84") || normalized.ends_with("CRS:84") {
            return Some(CrsCode::Epsg4326);
        }
        if !normalized.contains("EPSG") {
            return None;
        }

        let digits: String = normalized
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        digits.parse().ok().and_then(Self::from_epsg)
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg2180 => 2180,
            CrsCode::Epsg2176 => 2176,
            CrsCode::Epsg2177 => 2177,
            CrsCode::Epsg2178 => 2178,
            CrsCode::Epsg2179 => 2179,
            CrsCode::Epsg3120 => 3120,
            CrsCode::Epsg2172 => 2172,
            CrsCode::Epsg2173 => 2173,
            CrsCode::Epsg2174 => 2174,
            CrsCode::Epsg2175 => 2175,
        }
    }

    /// CS2000 zone number (5-8) for the zoned systems.
    pub fn cs2000_zone(&self) -> Option<u8> {
        match self {
            CrsCode::Epsg2176 => Some(5),
            CrsCode::Epsg2177 => Some(6),
            CrsCode::Epsg2178 => Some(7),
            CrsCode::Epsg2179 => Some(8),
            _ => None,
        }
    }

    /// CS2000 system for a zone number.
    pub fn from_cs2000_zone(zone: u8) -> Option<Self> {
        match zone {
            5 => Some(CrsCode::Epsg2176),
            6 => Some(CrsCode::Epsg2177),
            7 => Some(CrsCode::Epsg2178),
            8 => Some(CrsCode::Epsg2179),
            _ => None,
        }
    }

    /// CS65 zone number (1-5) for the legacy Pulkovo grids.
    pub fn cs65_zone(&self) -> Option<u8> {
        match self {
            CrsCode::Epsg3120 => Some(1),
            CrsCode::Epsg2172 => Some(2),
            CrsCode::Epsg2173 => Some(3),
            CrsCode::Epsg2174 => Some(4),
            CrsCode::Epsg2175 => Some(5),
            _ => None,
        }
    }

    /// Check if this is a geographic (lon/lat) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// Axis order for coordinate interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// First value is easting (or longitude)
    EastingNorthing,
    /// First value is northing (or latitude)
    NorthingEasting,
}

impl AxisOrder {
    /// Split a raw pair into (easting, northing) according to this order.
    pub fn easting_northing(self, pair: [f64; 2]) -> (f64, f64) {
        match self {
            AxisOrder::EastingNorthing => (pair[0], pair[1]),
            AxisOrder::NorthingEasting => (pair[1], pair[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srs_name() {
        assert_eq!(CrsCode::from_srs_name("EPSG:2180"), Some(CrsCode::Epsg2180));
        assert_eq!(
            CrsCode::from_srs_name("urn:ogc:def:crs:EPSG::2180"),
            Some(CrsCode::Epsg2180)
        );
        assert_eq!(
            CrsCode::from_srs_name("http://www.opengis.net/gml/srs/epsg.xml#2180"),
            Some(CrsCode::Epsg2180)
        );
        assert_eq!(
            CrsCode::from_srs_name("urn:ogc:def:crs:EPSG:6.9:2178"),
            Some(CrsCode::Epsg2178)
        );
        assert_eq!(
            CrsCode::from_srs_name("http://www.opengis.net/def/crs/EPSG/0/4326"),
            Some(CrsCode::Epsg4326)
        );
        assert_eq!(CrsCode::from_srs_name("CRS:84"), Some(CrsCode::Epsg4326));
        assert_eq!(CrsCode::from_srs_name("EPSG:3857"), None);
        assert_eq!(CrsCode::from_srs_name("local"), None);
    }

    #[test]
    fn test_cs2000_zones() {
        for zone in 5..=8 {
            let crs = CrsCode::from_cs2000_zone(zone).unwrap();
            assert_eq!(crs.cs2000_zone(), Some(zone));
        }
        assert_eq!(CrsCode::from_cs2000_zone(4), None);
        assert_eq!(CrsCode::Epsg2180.cs2000_zone(), None);
    }

    #[test]
    fn test_cs65_codes() {
        for (code, zone) in [(3120, 1), (2172, 2), (2173, 3), (2174, 4), (2175, 5)] {
            let crs = CrsCode::from_srs_name(&format!("EPSG:{code}")).unwrap();
            assert_eq!(crs.epsg(), code);
            assert_eq!(crs.cs65_zone(), Some(zone));
            assert_eq!(crs.cs2000_zone(), None);
            assert!(!crs.is_geographic());
        }
        assert_eq!(CrsCode::Epsg2180.cs65_zone(), None);
    }

    #[test]
    fn test_axis_order() {
        let pair = [486757.2, 637382.2];
        assert_eq!(
            AxisOrder::NorthingEasting.easting_northing(pair),
            (637382.2, 486757.2)
        );
        assert_eq!(CrsCode::Epsg2180.to_string(), "EPSG:2180");
    }
}
