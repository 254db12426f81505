//! Parcel and building lookup handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use feature_export::{ExportFormat, ExportedFile};
use metrics::counter;
use plot_common::{EntityQuery, EntityType, PlotError};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParcelParams {
    pub parcel_id: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuildingParams {
    pub building_id: Option<String>,
    pub format: Option<String>,
}

/// GET /api/parcel_by_id/?parcel_id=<id>[&format=<tag>]
pub async fn parcel_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ParcelParams>,
) -> Result<Response, ApiError> {
    lookup(&state, EntityType::Parcel, "parcel_id", params.parcel_id, params.format).await
}

/// GET /api/building_by_id/?building_id=<id>[&format=<tag>]
pub async fn building_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<BuildingParams>,
) -> Result<Response, ApiError> {
    lookup(&state, EntityType::Building, "building_id", params.building_id, params.format).await
}

/// Validate, resolve the endpoint, search, then answer with JSON or a file.
///
/// The format tag is checked before anything else so that a bad tag never
/// costs a network round trip.
#[instrument(skip(state, id, format), fields(entity = %entity_type))]
async fn lookup(
    state: &AppState,
    entity_type: EntityType,
    id_param: &'static str,
    id: Option<String>,
    format: Option<String>,
) -> Result<Response, ApiError> {
    let format = format
        .map(|tag| tag.parse::<ExportFormat>())
        .transpose()?;

    let id = id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PlotError::MissingParameter(id_param.to_string()))?;

    let teryt = state
        .admin_code(&id)
        .ok_or_else(|| PlotError::InvalidParameter {
            param: id_param.to_string(),
            message: format!("cannot derive an administrative code from '{}'", id),
        })?;

    let endpoint = state
        .registry
        .lookup(&teryt)
        .ok_or_else(|| PlotError::ServiceNotFound(teryt.clone()))?;

    let query = EntityQuery::new(entity_type, id.as_str());
    let feature = state.search.find_with_deadline(&endpoint, &query).await?;

    let response_kind = format.map(|f| f.as_str()).unwrap_or("json");
    counter!("api_lookups_total", "entity_type" => entity_type.as_str(), "format" => response_kind)
        .increment(1);

    match format {
        Some(format) => {
            let file = feature_export::export(&feature, &query, format)?;
            info!(id = %id, format = %format, bytes = file.content.len(), "Serving export");
            Ok(download(file))
        }
        None => {
            let mut body = json!({
                "status": "success",
                "teryt": teryt,
                "service": {
                    "organization": endpoint.organization,
                    "url": endpoint.url,
                },
                "data": {
                    "attributes": feature.attributes,
                    "geometry": feature.geometry,
                },
            });
            body[id_param] = json!(id);
            Ok(Json(body).into_response())
        }
    }
}

fn download(file: ExportedFile) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.media_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.content,
    )
        .into_response()
}
