//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use edge_gate::config::GateConfig;
use edge_gate::http::HttpServer;
use edge_gate::lifecycle::Shutdown;

pub const API_KEY: &str = "test-key";
pub const SESSION_COOKIE: &str = "sb-access-token";

/// What the renderer received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path_and_query: String,
    pub cookie: Option<String>,
    pub locale: Option<String>,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockUpstream {
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn last(&self) -> SeenRequest {
        self.seen().last().cloned().expect("upstream received no request")
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start a renderer that records every request and sets its own cookie.
pub async fn start_mock_upstream() -> MockUpstream {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorder = recorder.clone();
        async move {
            let read = |name: &str| {
                request
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            recorder.lock().unwrap().push(SeenRequest {
                path_and_query: request
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.to_string())
                    .unwrap_or_default(),
                cookie: read("cookie"),
                locale: read("x-locale"),
            });
            ([(header::SET_COOKIE, "renderer=1; Path=/")], "page")
        }
    });

    MockUpstream {
        addr: serve(app).await,
        seen,
    }
}

/// Start an identity provider.
///
/// `POST /refresh` signs in requests carrying `sb-access-token=valid` and rotates the token.
/// `POST /slow` answers after five seconds. Requests without the API key get 401.
pub async fn start_mock_identity() -> SocketAddr {
    async fn refresh(request: Request<Body>) -> axum::response::Response {
        let authorized = request
            .headers()
            .get("apikey")
            .map(|v| v == API_KEY)
            .unwrap_or(false);
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        let body = axum::body::to_bytes(request.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        let signed_in = body["cookies"]
            .as_array()
            .map(|cookies| {
                cookies
                    .iter()
                    .any(|c| c["name"] == SESSION_COOKIE && c["value"] == "valid")
            })
            .unwrap_or(false);

        if signed_in {
            Json(json!({
                "user": {"id": "user-1", "email": "user@example.com"},
                "cookies": [{
                    "name": SESSION_COOKIE,
                    "value": "rotated",
                    "options": {"path": "/", "httpOnly": true, "sameSite": "lax", "maxAge": 3600}
                }]
            }))
            .into_response()
        } else {
            Json(json!({"user": null, "cookies": []})).into_response()
        }
    }

    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({"user": {"id": "late"}, "cookies": []}))
    }

    let app = Router::new()
        .route("/refresh", post(refresh))
        .route("/slow", post(slow));
    serve(app).await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

pub fn gate_config(identity_endpoint: String, upstream: SocketAddr) -> GateConfig {
    let mut config = GateConfig::default();
    config.identity.endpoint = identity_endpoint;
    config.identity.api_key = Some(API_KEY.to_string());
    config.identity.timeout_ms = 1000;
    config.upstream.address = upstream.to_string();
    config.observability.metrics_enabled = false;
    config
}

/// Start the gate on an ephemeral port.
pub async fn start_gate(mut config: GateConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get("location")
        .map(|v| v.to_str().unwrap().to_string())
}
