//! Encoders that turn a normalized feature into a downloadable file.
//!
//! Supported formats:
//! - GeoJSON FeatureCollection (RFC 7946)
//! - GML 2 FeatureCollection
//! - KML 2.2 Placemark
//! - ESRI Shapefile (`.shp`, `.shx`, `.dbf`, `.prj`, `.cpg`) in a zip archive
//!
//! Every export carries the feature's attributes plus `entity_id` and
//! `entity_type`.

pub mod archive;
pub mod error;
pub mod geojson;
pub mod gml;
pub mod kml;
pub mod shapefile;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use plot_common::{EntityQuery, NormalizedFeature};
use tracing::debug;

pub use error::ExportError;

/// Requested download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    Gml,
    Kml,
    Shapefile,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::GeoJson,
        ExportFormat::Gml,
        ExportFormat::Kml,
        ExportFormat::Shapefile,
    ];

    /// Format tag as accepted in the `format` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Gml => "gml",
            ExportFormat::Kml => "kml",
            ExportFormat::Shapefile => "shp",
        }
    }

    /// MIME type of the produced file.
    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "application/geo+json",
            ExportFormat::Gml => "application/gml+xml",
            ExportFormat::Kml => "application/vnd.google-earth.kml+xml",
            ExportFormat::Shapefile => "application/zip",
        }
    }

    /// Download file name for an entity.
    pub fn file_name(&self, entity_id: &str) -> String {
        let stem = file_stem(entity_id);
        match self {
            ExportFormat::GeoJson => format!("{}.geojson", stem),
            ExportFormat::Gml => format!("{}.gml", stem),
            ExportFormat::Kml => format!("{}.kml", stem),
            ExportFormat::Shapefile => format!("{}_shapefile.zip", stem),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geojson" => Ok(ExportFormat::GeoJson),
            "gml" => Ok(ExportFormat::Gml),
            "kml" => Ok(ExportFormat::Kml),
            "shp" => Ok(ExportFormat::Shapefile),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded file ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub content: Vec<u8>,
    pub media_type: &'static str,
    pub filename: String,
}

/// Encode `feature` in `format`.
pub fn export(
    feature: &NormalizedFeature,
    query: &EntityQuery,
    format: ExportFormat,
) -> Result<ExportedFile, ExportError> {
    let attributes = export_attributes(feature, query);
    let geometry = feature.geometry.as_ref();
    let layer = query.entity_type().as_str();

    let content = match format {
        ExportFormat::GeoJson => geojson::encode(&attributes, geometry)?,
        ExportFormat::Gml => gml::encode(layer, &attributes, geometry).into_bytes(),
        ExportFormat::Kml => kml::encode(layer, query.entity_id(), &attributes, geometry).into_bytes(),
        ExportFormat::Shapefile => {
            let members = shapefile::encode(&attributes, geometry)?;
            let stem = file_stem(query.entity_id());
            let entries: Vec<(String, Vec<u8>)> = members
                .into_iter()
                .map(|(ext, bytes)| (format!("{}.{}", stem, ext), bytes))
                .collect();
            archive::write_archive(&entries)?
        }
    };

    debug!(format = %format, bytes = content.len(), id = query.entity_id(), "Exported feature");
    Ok(ExportedFile {
        content,
        media_type: format.media_type(),
        filename: format.file_name(query.entity_id()),
    })
}

/// Feature attributes plus `entity_id` and `entity_type`.
pub fn export_attributes(feature: &NormalizedFeature, query: &EntityQuery) -> BTreeMap<String, String> {
    let mut attributes = feature.attributes.clone();
    attributes.insert("entity_id".to_string(), query.entity_id().to_string());
    attributes.insert(
        "entity_type".to_string(),
        query.entity_type().as_str().to_string(),
    );
    attributes
}

/// File-system safe stem: parcel IDs contain `/` and `.`.
fn file_stem(entity_id: &str) -> String {
    let stem: String = entity_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "feature".to_string()
    } else {
        stem
    }
}
