//! In-band service exception detection.
//!
//! WFS servers often answer a bad request with HTTP 200 and an exception
//! document: `ServiceExceptionReport` (WFS 1.0) or `ows:ExceptionReport`
//! (WFS 1.1 and 2.0).

use crate::xml::parse_document;

/// Substrings that mark a response body as a service exception.
pub const EXCEPTION_MARKERS: [&str; 2] = ["ServiceException", "ExceptionReport"];

/// True if the body carries a service exception.
pub fn is_service_exception(body: &str) -> bool {
    EXCEPTION_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Human-readable text of the first exception message, if one can be found.
pub fn exception_text(body: &str) -> Option<String> {
    let root = parse_document(body).ok()?;
    root.find(|name| name == "ExceptionText" || name == "ServiceException")
        .and_then(|el| el.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
