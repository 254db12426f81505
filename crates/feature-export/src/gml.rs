//! GML 2 FeatureCollection output, readable by OGR and QGIS.

use std::collections::BTreeMap;
use std::fmt::Write;

use plot_common::{BoundingBox, Coord, Geometry};
use quick_xml::escape::escape;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ogr:FeatureCollection xmlns:ogr="http://ogr.maptools.org/" xmlns:gml="http://www.opengis.net/gml" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
"#;

/// Encode one feature as a GML FeatureCollection in EPSG:4326.
pub fn encode(layer: &str, attributes: &BTreeMap<String, String>, geometry: Option<&Geometry>) -> String {
    let mut out = String::from(HEADER);

    if let Some(bbox) = geometry.and_then(|g| BoundingBox::from_coords(&g.positions())) {
        let _ = write!(
            out,
            "  <gml:boundedBy>\n    <gml:Box srsName=\"EPSG:4326\">\n      <gml:coord><gml:X>{}</gml:X><gml:Y>{}</gml:Y></gml:coord>\n      <gml:coord><gml:X>{}</gml:X><gml:Y>{}</gml:Y></gml:coord>\n    </gml:Box>\n  </gml:boundedBy>\n",
            bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
        );
    }

    let layer = element_name(layer);
    out.push_str("  <gml:featureMember>\n");
    let _ = writeln!(out, "    <ogr:{} fid=\"{}.0\">", layer, layer);

    if let Some(geometry) = geometry {
        out.push_str("      <ogr:geometryProperty>");
        write_geometry(&mut out, geometry);
        out.push_str("</ogr:geometryProperty>\n");
    }

    for (key, value) in attributes {
        let name = element_name(key);
        let _ = writeln!(out, "      <ogr:{}>{}</ogr:{}>", name, escape(value.as_str()), name);
    }

    let _ = writeln!(out, "    </ogr:{}>", layer);
    out.push_str("  </gml:featureMember>\n</ogr:FeatureCollection>\n");
    out
}

fn write_geometry(out: &mut String, geometry: &Geometry) {
    match geometry {
        Geometry::Point { coordinates } => {
            out.push_str("<gml:Point srsName=\"EPSG:4326\">");
            write_coordinates(out, std::slice::from_ref(coordinates));
            out.push_str("</gml:Point>");
        }
        Geometry::LineString { coordinates } => {
            out.push_str("<gml:LineString srsName=\"EPSG:4326\">");
            write_coordinates(out, coordinates);
            out.push_str("</gml:LineString>");
        }
        Geometry::Polygon { coordinates } => {
            out.push_str("<gml:Polygon srsName=\"EPSG:4326\">");
            for (i, ring) in coordinates.iter().enumerate() {
                let boundary = if i == 0 { "outerBoundaryIs" } else { "innerBoundaryIs" };
                let _ = write!(out, "<gml:{}><gml:LinearRing>", boundary);
                write_coordinates(out, ring);
                let _ = write!(out, "</gml:LinearRing></gml:{}>", boundary);
            }
            out.push_str("</gml:Polygon>");
        }
    }
}

fn write_coordinates(out: &mut String, coords: &[Coord]) {
    out.push_str("<gml:coordinates>");
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", c[0], c[1]);
    }
    out.push_str("</gml:coordinates>");
}

/// Attribute keys come from remote schemas; keep them valid XML names.
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_with_hole() {
        let polygon = Geometry::polygon(vec![
            vec![[21.0, 52.0], [21.1, 52.0], [21.1, 52.1], [21.0, 52.0]],
            vec![[21.01, 52.01], [21.02, 52.01], [21.02, 52.02], [21.01, 52.01]],
        ]);
        let attributes = BTreeMap::from([("NUMER".to_string(), "12/4 <a&b>".to_string())]);
        let gml = encode("parcel", &attributes, Some(&polygon));

        assert!(gml.contains("<ogr:parcel fid=\"parcel.0\">"));
        assert!(gml.contains("<gml:outerBoundaryIs><gml:LinearRing><gml:coordinates>21,52 21.1,52"));
        assert!(gml.contains("<gml:innerBoundaryIs>"));
        assert!(gml.contains("<gml:X>21</gml:X><gml:Y>52</gml:Y>"));
        assert!(gml.contains("<ogr:NUMER>12/4 &lt;a&amp;b&gt;</ogr:NUMER>"));
    }

    #[test]
    fn test_output_is_well_formed() {
        let attributes = BTreeMap::from([("1 bad key".to_string(), "x".to_string())]);
        let gml = encode("building", &attributes, Some(&Geometry::point(21.0, 52.0)));
        assert!(gml.contains("<ogr:_1_bad_key>x</ogr:_1_bad_key>"));

        let mut reader = quick_xml::Reader::from_str(&gml);
        while !matches!(reader.read_event().unwrap(), quick_xml::events::Event::Eof) {}
    }

    #[test]
    fn test_without_geometry() {
        let gml = encode("parcel", &BTreeMap::new(), None);
        assert!(!gml.contains("boundedBy"));
        assert!(!gml.contains("geometryProperty"));
    }
}
