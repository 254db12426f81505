//! HTTP tests for the plot API router, backed by a mock WFS endpoint.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use tower::ServiceExt;

use plot_api::registry::Registry;
use plot_api::state::{prefix_rule, AppState};
use test_utils::{
    wfs20_parcel_collection, write_registry, MockResponse, MockWfs, Route, EMPTY_COLLECTION,
    PARCEL_ID,
};
use wfs_search::{FallbackSearch, SearchConfig};

const ORGANIZATION: &str = "Miasto Stołeczne Warszawa";

/// Mock endpoint serving the parcel for filtered WFS 2.0 requests on `Dzialki`.
async fn parcel_server() -> MockWfs {
    MockWfs::start(
        vec![Route::new(MockResponse::ok(wfs20_parcel_collection(PARCEL_ID)))
            .version("2.0.0")
            .type_name("Dzialki")
            .filtered(true)],
        MockResponse::ok(EMPTY_COLLECTION),
    )
    .await
}

fn app(server: &MockWfs, config: SearchConfig) -> Router {
    let registry_file = write_registry(&[
        ("1", "Starostwo Powiatowe w Piasecznie", "1418", "http://127.0.0.1:9/wfs"),
        ("2", ORGANIZATION, "1465", &server.url()),
    ]);
    let registry = Registry::load(registry_file.path()).unwrap();
    let search = FallbackSearch::with_http(config).unwrap();
    let state = Arc::new(AppState::with_search(search, registry, prefix_rule(4)));
    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    plot_api::router(state, prometheus)
}

/// Search limited to the first parcel layer and field.
fn narrow_config() -> SearchConfig {
    let mut config = SearchConfig::default();
    config.parcels.layers.truncate(1);
    config.parcels.fields.truncate(1);
    config
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_parcel_lookup_json() {
    let server = parcel_server().await;
    let response = get(
        app(&server, SearchConfig::default()),
        &format!("/api/parcel_by_id/?parcel_id={}", PARCEL_ID),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["parcel_id"], PARCEL_ID);
    assert_eq!(body["teryt"], "1465");
    assert_eq!(body["service"]["organization"], ORGANIZATION);
    assert_eq!(body["service"]["url"], server.url());
    assert_eq!(body["data"]["attributes"]["ID_DZIALKI"], PARCEL_ID);
    assert_eq!(body["data"]["geometry"]["type"], "Polygon");

    let lon = body["data"]["geometry"]["coordinates"][0][0][0].as_f64().unwrap();
    let lat = body["data"]["geometry"]["coordinates"][0][0][1].as_f64().unwrap();
    assert!((20.9..21.1).contains(&lon), "lon {lon}");
    assert!((52.1..52.3).contains(&lat), "lat {lat}");

    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_geojson_download() {
    let server = parcel_server().await;
    let response = get(
        app(&server, SearchConfig::default()),
        &format!("/api/parcel_by_id/?parcel_id={}&format=GeoJSON", PARCEL_ID),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/geo+json");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{}.geojson\"", PARCEL_ID).as_str()
    );

    let body = json_body(response).await;
    let props = &body["features"][0]["properties"];
    assert_eq!(props["entity_id"], PARCEL_ID);
    assert_eq!(props["entity_type"], "parcel");
}

#[tokio::test]
async fn test_shapefile_download() {
    let server = parcel_server().await;
    let response = get(
        app(&server, SearchConfig::default()),
        &format!("/api/parcel_by_id?parcel_id={}&format=shp", PARCEL_ID),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..4], b"PK\x03\x04");
}

#[tokio::test]
async fn test_unsupported_format_rejected_before_search() {
    let server = parcel_server().await;
    let response = get(
        app(&server, SearchConfig::default()),
        &format!("/api/parcel_by_id/?parcel_id={}&format=dxf", PARCEL_ID),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_missing_and_short_ids() {
    let server = parcel_server().await;

    let response = get(app(&server, SearchConfig::default()), "/api/parcel_by_id/").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("parcel_id"));

    let response = get(
        app(&server, SearchConfig::default()),
        "/api/building_by_id/?building_id=146",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_teryt() {
    let server = parcel_server().await;
    let response = get(
        app(&server, SearchConfig::default()),
        "/api/building_by_id/?building_id=0201010123456",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "No WFS service found for TERYT code: 0201");
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_parcel_not_found() {
    let server = parcel_server().await;
    let response = get(
        app(&server, narrow_config()),
        "/api/parcel_by_id/?parcel_id=146501_8.0101.99",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(
        body["detail"],
        "Parcel with ID 146501_8.0101.99 not found in any available layer"
    );
    // One request per version; only the 2.0.0 reply carries a parcel and
    // its ID differs.
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_landing_health_and_metrics() {
    let server = parcel_server().await;

    let body = json_body(get(app(&server, SearchConfig::default()), "/").await).await;
    let formats: Vec<&str> = body["supported_formats"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(formats, vec!["geojson", "gml", "kml", "shp"]);
    assert_eq!(body["endpoints"]["parcels"], "/api/parcel_by_id/");

    let body = json_body(get(app(&server, SearchConfig::default()), "/health").await).await;
    assert_eq!(body["status"], "ok");

    let response = get(app(&server, SearchConfig::default()), "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}
