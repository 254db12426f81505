//! GeoJSON FeatureCollection output.

use std::collections::BTreeMap;

use plot_common::Geometry;
use serde_json::{json, Value};

use crate::error::ExportError;

/// Pretty-printed FeatureCollection holding one Feature.
pub fn encode(
    attributes: &BTreeMap<String, String>,
    geometry: Option<&Geometry>,
) -> Result<Vec<u8>, ExportError> {
    let geometry = match geometry {
        Some(g) => serde_json::to_value(g)?,
        None => Value::Null,
    };
    let collection = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": attributes,
            "geometry": geometry,
        }],
    });
    Ok(serde_json::to_vec_pretty(&collection)?)
}
