//! Export error types.

use plot_common::PlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format: {0}. Supported formats: geojson, gml, kml, shp")]
    UnsupportedFormat(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive encoding failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shapefile encoding failed: {0}")]
    Shapefile(String),
}

impl From<ExportError> for PlotError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnsupportedFormat(tag) => PlotError::UnsupportedFormat(tag),
            other => PlotError::ExportFailure(other.to_string()),
        }
    }
}
