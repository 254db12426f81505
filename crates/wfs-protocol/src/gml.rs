//! GML geometry parsing (GML 2, 3.1 and 3.2).
//!
//! Coordinates are returned exactly as written, in the source CRS and
//! axis order; reprojection happens in [`crate::normalize`].

use plot_common::{Coord, Geometry};

use crate::error::ParseError;
use crate::xml::{parse_document, XmlElement};

/// Parse a geometry fragment into GeoJSON shape without reprojecting.
///
/// The fragment is walked in document order and the first Polygon, Point
/// or LineString that yields coordinates wins, so a multi-geometry
/// contributes its first member. Bare `LinearRing`s are ring parts, not
/// lines. Returns `Ok(None)` for geometry kinds that are not supported or
/// carry no usable coordinates.
pub fn parse_geometry(fragment: &str) -> Result<Option<Geometry>, ParseError> {
    let root = parse_document(fragment)?;
    Ok(first_geometry(&root))
}

/// Same as [`parse_geometry`] for an already parsed tree.
pub fn first_geometry(root: &XmlElement) -> Option<Geometry> {
    root.descendants().into_iter().find_map(|el| {
        let name = el.local_name();
        if name.contains("Polygon") {
            parse_polygon(el)
        } else if name.contains("Point") {
            parse_point(el)
        } else if name.contains("Line") && name != "LinearRing" {
            parse_line(el)
        } else {
            None
        }
    })
}

fn parse_polygon(el: &XmlElement) -> Option<Geometry> {
    let mut exterior = None;
    let mut holes = Vec::new();

    for child in el.child_elements() {
        match child.local_name() {
            "exterior" | "outerBoundaryIs" if exterior.is_none() => {
                exterior = ring_coords(child);
            }
            "interior" | "innerBoundaryIs" => {
                if let Some(ring) = ring_coords(child) {
                    holes.push(ring);
                }
            }
            _ => {}
        }
    }

    let mut rings = vec![exterior?];
    rings.extend(holes);
    Some(Geometry::polygon(rings))
}

fn parse_point(el: &XmlElement) -> Option<Geometry> {
    let coords = el
        .descendants()
        .into_iter()
        .skip(1)
        .find_map(|c| coordinate_element(c, dimension_of(el)))?;
    let first = *coords.first()?;
    Some(Geometry::Point { coordinates: first })
}

fn parse_line(el: &XmlElement) -> Option<Geometry> {
    let coords = sequence_coords(el)?;
    Some(Geometry::line_string(coords))
}

/// Coordinates of a ring container (`exterior`, `innerBoundaryIs`, ...).
fn ring_coords(container: &XmlElement) -> Option<Vec<Coord>> {
    sequence_coords(container)
}

/// Coordinates from `coordinates`, `posList`, or a run of `pos` elements.
fn sequence_coords(el: &XmlElement) -> Option<Vec<Coord>> {
    let dim = dimension_of(el);
    let descendants: Vec<_> = el.descendants().into_iter().skip(1).collect();

    if let Some(coords) = descendants
        .iter()
        .filter(|c| matches!(c.local_name(), "coordinates" | "posList"))
        .find_map(|c| coordinate_element(c, dim))
    {
        return Some(coords);
    }

    let positions: Vec<Coord> = descendants
        .iter()
        .filter(|c| c.local_name() == "pos")
        .filter_map(|c| coordinate_element(c, dim))
        .filter_map(|coords| coords.first().copied())
        .collect();
    (!positions.is_empty()).then_some(positions)
}

/// Parse one coordinate-bearing element; `None` if it is not one or is empty.
fn coordinate_element(el: &XmlElement, inherited_dim: usize) -> Option<Vec<Coord>> {
    let text = el.text()?;
    let coords = match el.local_name() {
        "coordinates" => parse_coordinates(&text),
        "posList" | "pos" => {
            let dim = el
                .attribute("srsDimension")
                .and_then(|d| d.trim().parse().ok())
                .unwrap_or(inherited_dim);
            parse_pos_list(&text, dim)
        }
        _ => return None,
    };
    (!coords.is_empty()).then_some(coords)
}

/// `srsDimension` declared on the element itself, defaulting to 2.
fn dimension_of(el: &XmlElement) -> usize {
    el.attribute("srsDimension")
        .and_then(|d| d.trim().parse().ok())
        .filter(|&d| d >= 2)
        .unwrap_or(2)
}

/// Parse the content of a coordinate element in either encoding.
///
/// GML 2 `coordinates` separates tuples with whitespace and values with
/// commas (`x,y x,y`); GML 3 `posList` is a flat whitespace-separated list.
/// Text with commas is always treated as tuples.
pub fn parse_coord_text(text: &str) -> Vec<Coord> {
    if text.contains(',') {
        parse_coordinates(text)
    } else {
        parse_pos_list(text, 2)
    }
}

fn parse_coordinates(text: &str) -> Vec<Coord> {
    if !text.contains(',') {
        return parse_pos_list(text, 2);
    }
    text.split_whitespace()
        .filter_map(|tuple| {
            let mut parts = tuple.split(',');
            let x = parts.next()?.trim().parse().ok()?;
            let y = parts.next()?.trim().parse().ok()?;
            Some([x, y])
        })
        .collect()
}

fn parse_pos_list(text: &str, dim: usize) -> Vec<Coord> {
    let dim = dim.max(2);
    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens
        .chunks(dim)
        .filter(|chunk| chunk.len() >= 2)
        .filter_map(|chunk| {
            let x = chunk[0].parse().ok()?;
            let y = chunk[1].parse().ok()?;
            Some([x, y])
        })
        .collect()
}
