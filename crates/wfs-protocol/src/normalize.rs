//! Geometry normalization: GML fragment in, WGS84 GeoJSON geometry out.

use plot_common::{AxisOrder, Coord, Geometry, NormalizedFeature, RawFeatureRecord};
use projection::CoordinateTransformer;
use tracing::debug;

use crate::detect::{detect_in, CrsDetection};
use crate::error::ParseError;
use crate::gml::first_geometry;
use crate::xml::parse_document;

/// Parses geometry fragments, detects their CRS and reprojects them.
#[derive(Debug, Clone, Default)]
pub struct GeometryNormalizer {
    transformer: CoordinateTransformer,
}

impl GeometryNormalizer {
    pub fn new(transformer: CoordinateTransformer) -> Self {
        Self { transformer }
    }

    /// Normalize one geometry fragment.
    ///
    /// `Ok(None)` means the fragment holds no supported geometry. Polygon
    /// rings are transformed independently, in order.
    pub fn normalize(&self, fragment: &str) -> Result<Option<Geometry>, ParseError> {
        let root = parse_document(fragment)?;
        let Some(geometry) = first_geometry(&root) else {
            debug!("Fragment has no supported geometry");
            return Ok(None);
        };
        let detection = detect_in(&root);

        let normalized = match geometry {
            Geometry::Point { coordinates } => {
                let out = self.reproject(&[coordinates], &detection);
                match out.first() {
                    Some(&c) => Geometry::Point { coordinates: c },
                    None => return Ok(None),
                }
            }
            Geometry::LineString { coordinates } => {
                Geometry::line_string(self.reproject(&coordinates, &detection))
            }
            Geometry::Polygon { coordinates } => Geometry::polygon(
                coordinates
                    .iter()
                    .map(|ring| self.reproject(ring, &detection))
                    .collect(),
            ),
        };
        Ok(Some(normalized))
    }

    /// Normalize a raw record. Attributes are carried over untouched.
    pub fn normalize_record(&self, record: &RawFeatureRecord) -> Result<NormalizedFeature, ParseError> {
        let geometry = match &record.geometry_fragment {
            Some(fragment) => self.normalize(fragment)?,
            None => None,
        };
        Ok(NormalizedFeature {
            attributes: record.attributes.clone(),
            geometry,
        })
    }

    fn reproject(&self, coords: &[Coord], detection: &CrsDetection) -> Vec<Coord> {
        let easting_first = to_easting_first(coords, detection.axis_order);
        self.transformer.transform(&easting_first, detection.crs).coords
    }
}

/// Reorder raw pairs so that easting (or longitude) comes first.
fn to_easting_first(coords: &[Coord], order: AxisOrder) -> Vec<Coord> {
    coords
        .iter()
        .map(|&pair| {
            let (e, n) = order.easting_northing(pair);
            [e, n]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::collections::BTreeMap;

    fn assert_near(c: Coord, lon: f64, lat: f64) {
        assert_abs_diff_eq!(c[0], lon, epsilon = 1e-4);
        assert_abs_diff_eq!(c[1], lat, epsilon = 1e-4);
    }

    #[test]
    fn test_urn_declared_cs92_is_northing_first() {
        let fragment = r#"<ms:msGeometry><gml:Point srsName="urn:ogc:def:crs:EPSG::2180">
<gml:pos>486757.209 637382.204</gml:pos></gml:Point></ms:msGeometry>"#;
        let Some(Geometry::Point { coordinates }) = GeometryNormalizer::default().normalize(fragment).unwrap() else {
            panic!("expected point");
        };
        assert_near(coordinates, 21.0122, 52.2297);
    }

    #[test]
    fn test_undeclared_cs92_polygon() {
        let fragment = r#"<the_geom><gml:Polygon><gml:outerBoundaryIs><gml:LinearRing><gml:coordinates>
637382.204,486757.209 637392.204,486757.209 637392.204,486767.209 637382.204,486757.209
</gml:coordinates></gml:LinearRing></gml:outerBoundaryIs></gml:Polygon></the_geom>"#;
        let geometry = GeometryNormalizer::default().normalize(fragment).unwrap().unwrap();
        assert_eq!(geometry.type_name(), "Polygon");
        let positions = geometry.positions();
        assert_eq!(positions.len(), 4);
        assert_near(positions[0], 21.0122, 52.2297);
        assert_eq!(positions[0], positions[3]);
    }

    #[test]
    fn test_declared_cs65_is_reprojected() {
        let fragment = r#"<gml:Point srsName="EPSG:3120"><gml:pos>5500000 4600000</gml:pos></gml:Point>"#;
        let Some(Geometry::Point { coordinates }) = GeometryNormalizer::default().normalize(fragment).unwrap() else {
            panic!("expected point");
        };
        assert_near(coordinates, 20.5553, 50.9202);
    }

    #[test]
    fn test_geographic_passthrough() {
        let fragment = r#"<geom><gml:LineString srsName="EPSG:4326"><gml:posList>21.0 52.0 21.1 52.1</gml:posList></gml:LineString></geom>"#;
        assert_eq!(
            GeometryNormalizer::default().normalize(fragment).unwrap(),
            Some(Geometry::line_string(vec![[21.0, 52.0], [21.1, 52.1]]))
        );
    }

    #[test]
    fn test_record_attributes_untouched() {
        let mut attributes = BTreeMap::new();
        attributes.insert("ID_DZIALKI".to_string(), " 146501_8.0101.12 ".to_string());
        let record = RawFeatureRecord {
            attributes: attributes.clone(),
            geometry_fragment: Some("<geom><gml:Envelope/></geom>".to_string()),
        };
        let feature = GeometryNormalizer::default().normalize_record(&record).unwrap();
        assert_eq!(feature.attributes, attributes);
        assert_eq!(feature.geometry, None);

        let broken = RawFeatureRecord {
            attributes,
            geometry_fragment: Some("<gml:Point>".to_string()),
        };
        assert!(GeometryNormalizer::default().normalize_record(&broken).is_err());
    }
}
