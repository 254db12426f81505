//! Error types for parcel and building retrieval.

use thiserror::Error;

/// Result type alias using PlotError.
pub type PlotResult<T> = Result<T, PlotError>;

/// Primary error type for feature retrieval and export.
///
/// Network, service-exception and parse failures stay inside the search
/// engine, which logs them and moves on to the next candidate. Only the
/// terminal variants reach the caller.
#[derive(Debug, Error)]
pub enum PlotError {
    // === Candidate Errors (soft) ===
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Service exception reported by {0}")]
    ServiceException(String),

    #[error("Failed to parse response: {0}")]
    ParseFailure(String),

    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    // === Terminal Outcomes ===
    #[error("No WFS service found for TERYT code: {0}")]
    ServiceNotFound(String),

    #[error("{entity} with ID {id} not found in any available layer")]
    NotFound { entity: String, id: String },

    #[error("Lookup deadline exceeded")]
    DeadlineExceeded,

    // === Infrastructure Errors ===
    #[error("Export failed: {0}")]
    ExportFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PlotError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            PlotError::MissingParameter(_)
            | PlotError::InvalidParameter { .. }
            | PlotError::UnsupportedFormat(_) => 400,

            PlotError::ServiceNotFound(_) | PlotError::NotFound { .. } => 404,

            PlotError::NetworkFailure(_)
            | PlotError::HttpStatus { .. }
            | PlotError::ServiceException(_) => 502,

            PlotError::DeadlineExceeded => 504,

            _ => 500,
        }
    }
}

impl From<serde_json::Error> for PlotError {
    fn from(err: serde_json::Error) -> Self {
        PlotError::ExportFailure(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PlotError::UnsupportedFormat("pdf".into()).http_status_code(), 400);
        assert_eq!(PlotError::ServiceNotFound("1465".into()).http_status_code(), 404);
        assert_eq!(
            PlotError::NotFound {
                entity: "Parcel".into(),
                id: "x".into()
            }
            .http_status_code(),
            404
        );
        assert_eq!(PlotError::ExportFailure("zip".into()).http_status_code(), 500);
        assert_eq!(PlotError::DeadlineExceeded.http_status_code(), 504);
    }

    #[test]
    fn test_not_found_message() {
        let err = PlotError::NotFound {
            entity: "Building".into(),
            id: "1465010123456".into(),
        };
        assert_eq!(
            err.to_string(),
            "Building with ID 1465010123456 not found in any available layer"
        );
    }
}
