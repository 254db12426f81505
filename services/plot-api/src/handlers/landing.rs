//! Landing page handler.

use axum::Json;
use feature_export::ExportFormat;
use serde_json::{json, Value};

/// GET / - Service description
pub async fn landing_handler() -> Json<Value> {
    let formats: Vec<&str> = ExportFormat::ALL.iter().map(ExportFormat::as_str).collect();
    Json(json!({
        "message": "PlotAPI - Polish Land Parcel and Building Search API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "parcels": "/api/parcel_by_id/",
            "buildings": "/api/building_by_id/",
        },
        "usage": {
            "search": "Add parcel_id or building_id parameter",
            "download": format!("Add format parameter ({}) to download file", formats.join(", ")),
        },
        "supported_formats": formats,
    }))
}
