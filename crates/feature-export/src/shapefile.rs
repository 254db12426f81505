//! ESRI Shapefile encoding for a single feature.
//!
//! Produces the five members of a shapefile set:
//! - `.shp`: geometry (header + one record)
//! - `.shx`: record index
//! - `.dbf`: dBase III attribute table, every field character typed
//! - `.prj`: WGS84 coordinate system as ESRI WKT
//! - `.cpg`: code page of the `.dbf` strings
//!
//! Integers in the file header and record headers are big-endian; everything
//! else is little-endian. Lengths are counted in 16-bit words.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Utc};
use plot_common::{BoundingBox, Coord, Geometry};

use crate::error::ExportError;

const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
const HEADER_LEN: usize = 100;

const SHAPE_NULL: i32 = 0;
const SHAPE_POINT: i32 = 1;
const SHAPE_POLYLINE: i32 = 3;
const SHAPE_POLYGON: i32 = 5;

/// dBase character fields hold at most 254 bytes.
const MAX_FIELD_LEN: usize = 254;
const MAX_FIELD_NAME: usize = 10;

pub const WGS84_PRJ: &str = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]";

/// Encode the feature; returns `(extension, bytes)` in archive order.
pub fn encode(
    attributes: &BTreeMap<String, String>,
    geometry: Option<&Geometry>,
) -> Result<Vec<(&'static str, Vec<u8>)>, ExportError> {
    let shape = Shape::from_geometry(geometry);
    let content = shape.content();
    let (shp, shx) = write_shp_shx(&shape, &content);
    let dbf = write_dbf(attributes)?;

    Ok(vec![
        ("shp", shp),
        ("shx", shx),
        ("dbf", dbf),
        ("prj", WGS84_PRJ.as_bytes().to_vec()),
        ("cpg", b"UTF-8".to_vec()),
    ])
}

/// One shape record, already in shapefile ring conventions.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Null,
    Point(Coord),
    PolyLine(Vec<Vec<Coord>>),
    Polygon(Vec<Vec<Coord>>),
}

impl Shape {
    fn from_geometry(geometry: Option<&Geometry>) -> Self {
        match geometry {
            None => Shape::Null,
            Some(Geometry::Point { coordinates }) => Shape::Point(*coordinates),
            Some(Geometry::LineString { coordinates }) if coordinates.is_empty() => Shape::Null,
            Some(Geometry::LineString { coordinates }) => Shape::PolyLine(vec![coordinates.clone()]),
            Some(Geometry::Polygon { coordinates }) => {
                let rings: Vec<Vec<Coord>> = coordinates
                    .iter()
                    .filter(|ring| !ring.is_empty())
                    .enumerate()
                    .map(|(i, ring)| orient_ring(ring, i == 0))
                    .collect();
                if rings.is_empty() {
                    Shape::Null
                } else {
                    Shape::Polygon(rings)
                }
            }
        }
    }

    fn shape_type(&self) -> i32 {
        match self {
            Shape::Null => SHAPE_NULL,
            Shape::Point(_) => SHAPE_POINT,
            Shape::PolyLine(_) => SHAPE_POLYLINE,
            Shape::Polygon(_) => SHAPE_POLYGON,
        }
    }

    fn bbox(&self) -> Option<BoundingBox> {
        match self {
            Shape::Null => None,
            Shape::Point(c) => BoundingBox::from_coords([c]),
            Shape::PolyLine(parts) | Shape::Polygon(parts) => {
                BoundingBox::from_coords(parts.iter().flatten())
            }
        }
    }

    /// Record content, without the 8-byte record header.
    fn content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.shape_type().to_le_bytes());
        match self {
            Shape::Null => {}
            Shape::Point(c) => {
                out.extend_from_slice(&c[0].to_le_bytes());
                out.extend_from_slice(&c[1].to_le_bytes());
            }
            Shape::PolyLine(parts) | Shape::Polygon(parts) => {
                write_bbox(&mut out, self.bbox());
                let num_points: usize = parts.iter().map(Vec::len).sum();
                out.extend_from_slice(&(parts.len() as i32).to_le_bytes());
                out.extend_from_slice(&(num_points as i32).to_le_bytes());
                let mut start = 0usize;
                for part in parts {
                    out.extend_from_slice(&(start as i32).to_le_bytes());
                    start += part.len();
                }
                for c in parts.iter().flatten() {
                    out.extend_from_slice(&c[0].to_le_bytes());
                    out.extend_from_slice(&c[1].to_le_bytes());
                }
            }
        }
        out
    }
}

/// Close the ring and wind it clockwise (exterior) or counter-clockwise (hole).
fn orient_ring(ring: &[Coord], exterior: bool) -> Vec<Coord> {
    let mut ring = ring.to_vec();
    if ring.first() != ring.last() {
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
    }
    let area = signed_area(&ring);
    if (exterior && area > 0.0) || (!exterior && area < 0.0) {
        ring.reverse();
    }
    ring
}

/// Shoelace formula; positive for counter-clockwise rings.
fn signed_area(ring: &[Coord]) -> f64 {
    ring.windows(2)
        .map(|w| w[0][0] * w[1][1] - w[1][0] * w[0][1])
        .sum::<f64>()
        / 2.0
}

fn write_bbox(out: &mut Vec<u8>, bbox: Option<BoundingBox>) {
    let bbox = bbox.unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0));
    for v in [bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y] {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

fn write_header(out: &mut Vec<u8>, file_len_bytes: usize, shape: &Shape) {
    out.extend_from_slice(&FILE_CODE.to_be_bytes());
    out.extend_from_slice(&[0u8; 20]);
    out.extend_from_slice(&((file_len_bytes / 2) as i32).to_be_bytes());
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&shape.shape_type().to_le_bytes());
    write_bbox(out, shape.bbox());
    // Z and M ranges
    out.extend_from_slice(&[0u8; 32]);
}

fn write_shp_shx(shape: &Shape, content: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let content_words = (content.len() / 2) as i32;

    let shp_len = HEADER_LEN + 8 + content.len();
    let mut shp = Vec::with_capacity(shp_len);
    write_header(&mut shp, shp_len, shape);
    shp.extend_from_slice(&1i32.to_be_bytes());
    shp.extend_from_slice(&content_words.to_be_bytes());
    shp.extend_from_slice(content);

    let shx_len = HEADER_LEN + 8;
    let mut shx = Vec::with_capacity(shx_len);
    write_header(&mut shx, shx_len, shape);
    shx.extend_from_slice(&((HEADER_LEN / 2) as i32).to_be_bytes());
    shx.extend_from_slice(&content_words.to_be_bytes());

    (shp, shx)
}

/// dBase III table with one record.
fn write_dbf(attributes: &BTreeMap<String, String>) -> Result<Vec<u8>, ExportError> {
    let names = field_names(attributes.keys());
    let values: Vec<&str> = attributes
        .values()
        .map(|v| truncate_bytes(v.trim(), MAX_FIELD_LEN))
        .collect();
    let lengths: Vec<usize> = values.iter().map(|v| v.len().max(1)).collect();

    let header_len = 32 + 32 * names.len() + 1;
    let record_len = 1 + lengths.iter().sum::<usize>();
    let header_len = u16::try_from(header_len)
        .map_err(|_| ExportError::Shapefile(format!("too many fields: {}", names.len())))?;
    let record_len = u16::try_from(record_len)
        .map_err(|_| ExportError::Shapefile(format!("record too long: {} bytes", record_len)))?;

    let today = Utc::now().date_naive();
    let mut out = Vec::with_capacity(header_len as usize + record_len as usize + 1);
    out.push(0x03);
    out.push((today.year() - 1900).clamp(0, 255) as u8);
    out.push(today.month() as u8);
    out.push(today.day() as u8);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(&record_len.to_le_bytes());
    out.extend_from_slice(&[0u8; 20]);

    for (name, len) in names.iter().zip(&lengths) {
        let mut descriptor = [0u8; 32];
        descriptor[..name.len()].copy_from_slice(name.as_bytes());
        descriptor[11] = b'C';
        descriptor[16] = *len as u8;
        out.extend_from_slice(&descriptor);
    }
    out.push(0x0D);

    out.push(b' ');
    for (value, len) in values.iter().zip(&lengths) {
        out.extend_from_slice(value.as_bytes());
        out.resize(out.len() + (len - value.len()), b' ');
    }
    out.push(0x1A);

    Ok(out)
}

/// ASCII field names of at most ten bytes, unique within the table.
fn field_names<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut names = Vec::new();
    for key in keys {
        let base: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .take(MAX_FIELD_NAME)
            .collect();
        let base = if base.is_empty() { "FIELD".to_string() } else { base };

        let mut name = base.clone();
        let mut n = 1;
        while !taken.insert(name.to_ascii_uppercase()) {
            let suffix = format!("_{}", n);
            let keep = MAX_FIELD_NAME.saturating_sub(suffix.len()).min(base.len());
            name = format!("{}{}", &base[..keep], suffix);
            n += 1;
        }
        names.push(name);
    }
    names
}

fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i32_be(bytes: &[u8], at: usize) -> i32 {
        i32::from_be_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn i32_le(bytes: &[u8], at: usize) -> i32 {
        i32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn f64_le(bytes: &[u8], at: usize) -> f64 {
        f64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
    }

    fn member<'a>(members: &'a [(&'static str, Vec<u8>)], ext: &str) -> &'a [u8] {
        &members.iter().find(|(e, _)| *e == ext).unwrap().1
    }

    fn square_ccw() -> Vec<Coord> {
        vec![[21.0, 52.0], [21.1, 52.0], [21.1, 52.1], [21.0, 52.1], [21.0, 52.0]]
    }

    #[test]
    fn test_polygon_shp_layout() {
        let polygon = Geometry::polygon(vec![square_ccw()]);
        let members = encode(&BTreeMap::new(), Some(&polygon)).unwrap();
        let shp = member(&members, "shp");

        assert_eq!(i32_be(shp, 0), 9994);
        assert_eq!(i32_be(shp, 24) as usize * 2, shp.len());
        assert_eq!(i32_le(shp, 28), 1000);
        assert_eq!(i32_le(shp, 32), SHAPE_POLYGON);
        assert_eq!(f64_le(shp, 36), 21.0);
        assert_eq!(f64_le(shp, 60), 52.1);

        // record header then content
        assert_eq!(i32_be(shp, 100), 1);
        let content_len = i32_be(shp, 104) as usize * 2;
        assert_eq!(content_len, 44 + 4 + 5 * 16);
        assert_eq!(i32_le(shp, 108), SHAPE_POLYGON);
        assert_eq!(i32_le(shp, 144), 1);
        assert_eq!(i32_le(shp, 148), 5);
    }

    #[test]
    fn test_shx_points_at_record() {
        let members = encode(&BTreeMap::new(), Some(&Geometry::point(21.0, 52.0))).unwrap();
        let shx = member(&members, "shx");
        assert_eq!(shx.len(), 108);
        assert_eq!(i32_be(shx, 24), 54);
        assert_eq!(i32_be(shx, 100), 50);
        assert_eq!(i32_be(shx, 104), 10);
    }

    #[test]
    fn test_ring_orientation() {
        let exterior = orient_ring(&square_ccw(), true);
        assert!(signed_area(&exterior) < 0.0);

        let mut cw = square_ccw();
        cw.reverse();
        let hole = orient_ring(&cw, false);
        assert!(signed_area(&hole) > 0.0);
    }

    #[test]
    fn test_open_ring_is_closed() {
        let ring = orient_ring(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]], true);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_null_shape_without_geometry() {
        let members = encode(&BTreeMap::new(), None).unwrap();
        let shp = member(&members, "shp");
        assert_eq!(i32_le(shp, 32), SHAPE_NULL);
        assert_eq!(i32_be(shp, 104), 2);
        assert_eq!(shp.len(), 112);
    }

    #[test]
    fn test_dbf_layout() {
        let attributes = BTreeMap::from([
            ("FUNKCJA".to_string(), "mieszkalny".to_string()),
            ("entity_id".to_string(), "1465010123456".to_string()),
        ]);
        let members = encode(&attributes, None).unwrap();
        let dbf = member(&members, "dbf");

        assert_eq!(dbf[0], 0x03);
        assert_eq!(u32::from_le_bytes(dbf[4..8].try_into().unwrap()), 1);
        let header_len = u16::from_le_bytes(dbf[8..10].try_into().unwrap()) as usize;
        let record_len = u16::from_le_bytes(dbf[10..12].try_into().unwrap()) as usize;
        assert_eq!(header_len, 32 + 2 * 32 + 1);
        assert_eq!(record_len, 1 + 10 + 13);
        assert_eq!(&dbf[32..39], b"FUNKCJA");
        assert_eq!(dbf[32 + 11], b'C');
        assert_eq!(dbf[header_len - 1], 0x0D);
        assert_eq!(dbf[header_len], b' ');
        assert_eq!(&dbf[header_len + 1..header_len + 11], b"mieszkalny");
        assert_eq!(dbf.len(), header_len + record_len + 1);
        assert_eq!(*dbf.last().unwrap(), 0x1A);
    }

    #[test]
    fn test_field_names_truncated_and_unique() {
        let keys = vec![
            "POWIERZCHNIA_A".to_string(),
            "POWIERZCHNIA_B".to_string(),
            "ŁĄKA".to_string(),
        ];
        let names = field_names(keys.iter());
        assert_eq!(names, vec!["POWIERZCHN", "POWIERZC_1", "__KA"]);
    }

    #[test]
    fn test_long_values_truncated_on_char_boundary() {
        let value = "ż".repeat(200);
        let truncated = truncate_bytes(&value, MAX_FIELD_LEN);
        assert!(truncated.len() <= MAX_FIELD_LEN);
        assert_eq!(truncated.len() % 2, 0);
    }

    #[test]
    fn test_auxiliary_members() {
        let members = encode(&BTreeMap::new(), None).unwrap();
        let exts: Vec<_> = members.iter().map(|(e, _)| *e).collect();
        assert_eq!(exts, vec!["shp", "shx", "dbf", "prj", "cpg"]);
        assert!(std::str::from_utf8(member(&members, "prj")).unwrap().starts_with("GEOGCS["));
        assert_eq!(member(&members, "cpg"), b"UTF-8");
    }
}
