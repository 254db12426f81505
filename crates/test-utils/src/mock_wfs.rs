//! In-process WFS endpoint for end-to-end tests.
//!
//! The server answers `GET /wfs` from a list of [`Route`]s, checked in
//! order, and records every request it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::task::JoinHandle;

/// Query parameters of one received request, keys uppercased.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub params: HashMap<String, String>,
}

impl RecordedRequest {
    fn new(raw: HashMap<String, String>) -> Self {
        Self {
            params: raw
                .into_iter()
                .map(|(k, v)| (k.to_ascii_uppercase(), v))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(&key.to_ascii_uppercase()).map(String::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.get("VERSION")
    }

    /// Layer name from either `TYPENAMES` or `TYPENAME`.
    pub fn type_name(&self) -> Option<&str> {
        self.get("TYPENAMES").or_else(|| self.get("TYPENAME"))
    }

    pub fn is_filtered(&self) -> bool {
        self.params.contains_key("FILTER")
    }
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// Matches requests by version, layer and whether a filter is present.
/// Unset criteria match anything.
#[derive(Debug, Clone)]
pub struct Route {
    version: Option<String>,
    type_name: Option<String>,
    filtered: Option<bool>,
    response: MockResponse,
}

impl Route {
    pub fn new(response: MockResponse) -> Self {
        Self {
            version: None,
            type_name: None,
            filtered: None,
            response,
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn type_name(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn filtered(mut self, filtered: bool) -> Self {
        self.filtered = Some(filtered);
        self
    }

    fn matches(&self, req: &RecordedRequest) -> bool {
        self.version.as_deref().map_or(true, |v| req.version() == Some(v))
            && self.type_name.as_deref().map_or(true, |t| req.type_name() == Some(t))
            && self.filtered.map_or(true, |f| req.is_filtered() == f)
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<Vec<Route>>,
    fallback: MockResponse,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A running mock WFS server. Aborted on drop.
pub struct MockWfs {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockWfs {
    /// Start serving on an ephemeral localhost port.
    ///
    /// Requests no route matches receive `fallback`.
    pub async fn start(routes: Vec<Route>, fallback: MockResponse) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            routes: Arc::new(routes),
            fallback,
            requests: requests.clone(),
        };

        let app = Router::new().route("/wfs", get(handle)).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock WFS listener");
        let addr = listener.local_addr().expect("mock WFS local address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Endpoint URL to hand to the client.
    pub fn url(&self) -> String {
        format!("http://{}/wfs", self.addr)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Drop for MockWfs {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let request = RecordedRequest::new(params);
    let response = state
        .routes
        .iter()
        .find(|route| route.matches(&request))
        .map(|route| route.response.clone())
        .unwrap_or_else(|| state.fallback.clone());

    if let Ok(mut log) = state.requests.lock() {
        log.push(request);
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [("content-type", "text/xml; charset=utf-8")], response.body)
}
