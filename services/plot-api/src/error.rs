//! HTTP mapping of lookup errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_export::ExportError;
use plot_common::PlotError;
use serde::Serialize;
use tracing::{error, warn};

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// A [`PlotError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub PlotError);

impl From<PlotError> for ApiError {
    fn from(err: PlotError) -> Self {
        ApiError(err)
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PlotError::UnsupportedFormat("pdf".into()), StatusCode::BAD_REQUEST),
            (PlotError::ServiceNotFound("1465".into()), StatusCode::NOT_FOUND),
            (PlotError::DeadlineExceeded, StatusCode::GATEWAY_TIMEOUT),
            (PlotError::ExportFailure("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_export_error_conversion() {
        let err: ApiError = ExportError::UnsupportedFormat("dxf".into()).into();
        assert!(matches!(err.0, PlotError::UnsupportedFormat(_)));
    }
}
