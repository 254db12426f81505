//! KML 2.2 document with a single Placemark.

use std::collections::BTreeMap;
use std::fmt::Write;

use plot_common::{Coord, Geometry};
use quick_xml::escape::escape;

/// Encode one feature as a KML Placemark named after the entity.
pub fn encode(
    layer: &str,
    entity_id: &str,
    attributes: &BTreeMap<String, String>,
    geometry: Option<&Geometry>,
) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n<Document>\n",
    );
    let _ = writeln!(out, "  <name>{}</name>", escape(layer));
    out.push_str("  <Placemark>\n");
    let _ = writeln!(out, "    <name>{}</name>", escape(entity_id));

    out.push_str("    <ExtendedData>\n");
    for (key, value) in attributes {
        let _ = writeln!(
            out,
            "      <Data name=\"{}\"><value>{}</value></Data>",
            escape(key.as_str()),
            escape(value.as_str())
        );
    }
    out.push_str("    </ExtendedData>\n");

    if let Some(geometry) = geometry {
        out.push_str("    ");
        write_geometry(&mut out, geometry);
        out.push('\n');
    }

    out.push_str("  </Placemark>\n</Document>\n</kml>\n");
    out
}

fn write_geometry(out: &mut String, geometry: &Geometry) {
    match geometry {
        Geometry::Point { coordinates } => {
            out.push_str("<Point>");
            write_coordinates(out, std::slice::from_ref(coordinates));
            out.push_str("</Point>");
        }
        Geometry::LineString { coordinates } => {
            out.push_str("<LineString>");
            write_coordinates(out, coordinates);
            out.push_str("</LineString>");
        }
        Geometry::Polygon { coordinates } => {
            out.push_str("<Polygon>");
            for (i, ring) in coordinates.iter().enumerate() {
                let boundary = if i == 0 { "outerBoundaryIs" } else { "innerBoundaryIs" };
                let _ = write!(out, "<{}><LinearRing>", boundary);
                write_coordinates(out, ring);
                let _ = write!(out, "</LinearRing></{}>", boundary);
            }
            out.push_str("</Polygon>");
        }
    }
}

fn write_coordinates(out: &mut String, coords: &[Coord]) {
    out.push_str("<coordinates>");
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", c[0], c[1]);
    }
    out.push_str("</coordinates>");
}
