//! CRS detection for GML geometry fragments.
//!
//! A declared `srsName` always wins. Without one, the first coordinate
//! pair is classified by numeric range:
//!
//! | Range                                              | CRS              |
//! |----------------------------------------------------|------------------|
//! | within [-180, 180] x [-90, 90]                     | WGS84            |
//! | easting `Z_xxx_xxx` (Z = 5..8) and northing 5.35-6.15 Mm | CS2000 zone Z |
//! | both values within 100 km - 900 km                 | CS92             |
//! | anything else                                      | CS92 (default)   |
//!
//! CS2000 zone 5 eastings overlap the northing band, so a zone-5 pair with
//! swapped axes cannot be told apart from the as-given order; the as-given
//! order is preferred.

use plot_common::{AxisOrder, BoundingBox, Coord, CrsCode};
use tracing::debug;

use crate::error::ParseError;
use crate::gml::parse_coord_text;
use crate::xml::{parse_document, XmlElement};

/// CS2000 northing band covering Poland (meters).
const CS2000_NORTHING: (f64, f64) = (5_350_000.0, 6_150_000.0);
/// Offset from the zone prefix that CS2000 and CS92 eastings fall into.
const GRID_OFFSET: (f64, f64) = (100_000.0, 900_000.0);

/// How a CRS was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// From an `srsName` attribute
    Declared,
    /// From the numeric range of the first coordinate pair
    Heuristic,
    /// Nothing conclusive; primary national CRS assumed
    Default,
}

/// Detected CRS and the axis order the raw pairs are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrsDetection {
    pub crs: CrsCode,
    pub axis_order: AxisOrder,
    pub source: DetectionSource,
}

impl CrsDetection {
    fn fallback() -> Self {
        Self {
            crs: CrsCode::PRIMARY,
            axis_order: AxisOrder::EastingNorthing,
            source: DetectionSource::Default,
        }
    }
}

/// Detect the CRS of a geometry fragment.
pub fn detect_crs(fragment: &str) -> Result<CrsDetection, ParseError> {
    let root = parse_document(fragment)?;
    Ok(detect_in(&root))
}

/// Detect the CRS of an already parsed fragment.
pub fn detect_in(root: &XmlElement) -> CrsDetection {
    if let Some(declared) = declared_crs(root) {
        return declared;
    }

    let detection = first_pair(root)
        .and_then(classify)
        .map(|(crs, axis_order)| CrsDetection {
            crs,
            axis_order,
            source: DetectionSource::Heuristic,
        })
        .unwrap_or_else(CrsDetection::fallback);

    debug!(crs = %detection.crs, source = ?detection.source, "Detected CRS without declaration");
    detection
}

/// First recognized `srsName` in document order.
fn declared_crs(root: &XmlElement) -> Option<CrsDetection> {
    root.descendants().into_iter().find_map(|el| {
        let srs_name = el.attribute("srsName")?;
        match CrsCode::from_srs_name(srs_name) {
            Some(crs) => Some(CrsDetection {
                crs,
                axis_order: declared_axis_order(srs_name),
                source: DetectionSource::Declared,
            }),
            None => {
                debug!(srs_name, "Ignoring unrecognized srsName");
                None
            }
        }
    })
}

/// Axis order implied by the spelling of an `srsName`.
///
/// URN and `/def/crs/` URI forms promise the EPSG authority order, which is
/// northing first for the Polish grids and latitude first for EPSG:4326.
/// The legacy `EPSG:nnnn` and `epsg.xml#nnnn` forms are easting first, as
/// is CRS84.
pub fn declared_axis_order(srs_name: &str) -> AxisOrder {
    let upper = srs_name.trim().to_ascii_uppercase();
    if upper.ends_with("CRS84") || upper.ends_with("CRS:84") {
        AxisOrder::EastingNorthing
    } else if upper.starts_with("URN:") || upper.contains("/DEF/CRS/") {
        AxisOrder::NorthingEasting
    } else {
        AxisOrder::EastingNorthing
    }
}

/// First pair found in any coordinate-bearing element.
fn first_pair(root: &XmlElement) -> Option<Coord> {
    root.descendants()
        .into_iter()
        .filter(|el| matches!(el.local_name(), "coordinates" | "posList" | "pos"))
        .find_map(|el| parse_coord_text(&el.text()?).first().copied())
}

/// Classify a raw pair by numeric range.
pub fn classify(pair: Coord) -> Option<(CrsCode, AxisOrder)> {
    let [a, b] = pair;
    if !a.is_finite() || !b.is_finite() {
        return None;
    }

    if BoundingBox::WORLD.contains_point(a, b) {
        let order = if !BoundingBox::POLAND.contains_point(a, b)
            && BoundingBox::POLAND.contains_point(b, a)
        {
            AxisOrder::NorthingEasting
        } else {
            AxisOrder::EastingNorthing
        };
        return Some((CrsCode::Epsg4326, order));
    }

    if let (Some(zone), true) = (cs2000_zone_of_easting(a), is_cs2000_northing(b)) {
        return CrsCode::from_cs2000_zone(zone).map(|crs| (crs, AxisOrder::EastingNorthing));
    }
    if let (Some(zone), true) = (cs2000_zone_of_easting(b), is_cs2000_northing(a)) {
        return CrsCode::from_cs2000_zone(zone).map(|crs| (crs, AxisOrder::NorthingEasting));
    }

    if in_grid_offset(a) && in_grid_offset(b) {
        return Some((CrsCode::Epsg2180, AxisOrder::EastingNorthing));
    }

    None
}

fn cs2000_zone_of_easting(v: f64) -> Option<u8> {
    let zone = (v / 1_000_000.0).floor();
    if !(5.0..=8.0).contains(&zone) {
        return None;
    }
    in_grid_offset(v - zone * 1_000_000.0).then_some(zone as u8)
}

fn is_cs2000_northing(v: f64) -> bool {
    (CS2000_NORTHING.0..=CS2000_NORTHING.1).contains(&v)
}

fn in_grid_offset(v: f64) -> bool {
    (GRID_OFFSET.0..=GRID_OFFSET.1).contains(&v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_wins_over_coordinates() {
        let fragment = r#"<gml:Point srsName="EPSG:2180"><gml:pos>21.0 52.2</gml:pos></gml:Point>"#;
        let detection = detect_crs(fragment).unwrap();
        assert_eq!(detection.crs, CrsCode::Epsg2180);
        assert_eq!(detection.source, DetectionSource::Declared);
        assert_eq!(detection.axis_order, AxisOrder::EastingNorthing);
    }

    #[test]
    fn test_srs_name_spellings_agree_on_crs() {
        for srs in [
            "urn:ogc:def:crs:EPSG::2180",
            "EPSG:2180",
            "http://www.opengis.net/gml/srs/epsg.xml#2180",
        ] {
            let fragment = format!(r#"<gml:Point srsName="{srs}"><gml:pos>1 2</gml:pos></gml:Point>"#);
            assert_eq!(detect_crs(&fragment).unwrap().crs, CrsCode::Epsg2180, "{srs}");
        }
        assert_eq!(
            declared_axis_order("urn:ogc:def:crs:EPSG::2180"),
            AxisOrder::NorthingEasting
        );
        assert_eq!(
            declared_axis_order("http://www.opengis.net/def/crs/EPSG/0/2178"),
            AxisOrder::NorthingEasting
        );
        assert_eq!(
            declared_axis_order("http://www.opengis.net/gml/srs/epsg.xml#2180"),
            AxisOrder::EastingNorthing
        );
    }

    #[test]
    fn test_declared_cs65_zones() {
        let zones = [
            ("EPSG:3120", CrsCode::Epsg3120),
            ("urn:ogc:def:crs:EPSG::2172", CrsCode::Epsg2172),
            ("http://www.opengis.net/gml/srs/epsg.xml#2173", CrsCode::Epsg2173),
            ("http://www.opengis.net/def/crs/EPSG/0/2174", CrsCode::Epsg2174),
            ("EPSG:2175", CrsCode::Epsg2175),
        ];
        for (srs, crs) in zones {
            let fragment = format!(
                r#"<gml:Point srsName="{srs}"><gml:pos>5500000 4600000</gml:pos></gml:Point>"#
            );
            let detection = detect_crs(&fragment).unwrap();
            assert_eq!(detection.crs, crs, "{srs}");
            assert_eq!(detection.source, DetectionSource::Declared, "{srs}");
        }
    }

    #[test]
    fn test_first_recognized_declaration_wins() {
        let fragment = r#"<gml:MultiSurface srsName="EPSG:3857"><gml:surfaceMember>
<gml:Polygon srsName="EPSG:2178"><gml:exterior><gml:posList>1 2 3 4</gml:posList></gml:exterior></gml:Polygon>
</gml:surfaceMember></gml:MultiSurface>"#;
        assert_eq!(detect_crs(fragment).unwrap().crs, CrsCode::Epsg2178);
    }

    #[test]
    fn test_geographic_range() {
        let fragment = r#"<gml:Point><gml:coordinates>21.0122,52.2297</gml:coordinates></gml:Point>"#;
        let detection = detect_crs(fragment).unwrap();
        assert_eq!(detection.crs, CrsCode::Epsg4326);
        assert_eq!(detection.source, DetectionSource::Heuristic);
        assert_eq!(detection.axis_order, AxisOrder::EastingNorthing);

        assert_eq!(
            classify([52.2297, 21.0122]),
            Some((CrsCode::Epsg4326, AxisOrder::NorthingEasting))
        );
    }

    #[test]
    fn test_cs2000_zone_from_easting_prefix() {
        assert_eq!(
            classify([7_500_833.5, 5_788_456.5]),
            Some((CrsCode::Epsg2178, AxisOrder::EastingNorthing))
        );
        assert_eq!(
            classify([5_549_046.3, 6_638_653.8]),
            Some((CrsCode::Epsg2177, AxisOrder::NorthingEasting))
        );
    }

    #[test]
    fn test_cs92_range_and_default() {
        let fragment = r#"<gml:Point><gml:pos>637382.2 486757.2</gml:pos></gml:Point>"#;
        let detection = detect_crs(fragment).unwrap();
        assert_eq!(detection.crs, CrsCode::Epsg2180);
        assert_eq!(detection.source, DetectionSource::Heuristic);

        let fragment = r#"<gml:Point><gml:pos>12345678 1</gml:pos></gml:Point>"#;
        let detection = detect_crs(fragment).unwrap();
        assert_eq!(detection.crs, CrsCode::PRIMARY);
        assert_eq!(detection.source, DetectionSource::Default);

        let detection = detect_crs("<geom/>").unwrap();
        assert_eq!(detection.source, DetectionSource::Default);
    }
}
