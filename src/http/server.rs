//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the interception handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Run the interceptor for every non-bypassed request
//! - Forward allowed requests to the page renderer
//! - Render redirects and routing misses directly

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, request::Parts, uri::Scheme, HeaderValue, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GateConfig;
use crate::http::cookie::{apply_mutations, render_cookie_header};
use crate::http::request::{request_id, GateRequest, MakeGateRequestId};
use crate::http::path::encode_path;
use crate::http::response;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::pipeline::Interceptor;
use crate::routing::{AnyMatcher, Matcher};
use crate::session::{HttpIdentityProvider, IdentityResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub interceptor: Arc<Interceptor<HttpIdentityProvider>>,
    pub bypass: Arc<AnyMatcher>,
    pub client: Client<HttpConnector, Body>,
    /// Renderer authority, e.g. `127.0.0.1:3000`.
    pub upstream: Arc<str>,
}

/// HTTP server for the edge gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> IdentityResult<Self> {
        let provider = HttpIdentityProvider::new(&config.identity)?;
        let interceptor = Arc::new(Interceptor::new(&config, provider));
        let bypass = Arc::new(AnyMatcher::from_config(&config.bypass));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            interceptor,
            bypass,
            client,
            upstream: Arc::from(config.upstream.address.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gate_handler))
            .route("/", any(gate_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeGateRequestId))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

/// Main interception handler.
/// Runs the pipeline, then redirects, rejects, or forwards to the renderer.
async fn gate_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    // Bypass and pipeline decisions read the canonical path, and the renderer
    // only ever receives that path re-encoded.
    let view = GateRequest::from_http(&parts.uri, &parts.headers);
    let path = view.path().to_string();

    if state.bypass.matches(&path) {
        tracing::trace!(request_id = %request_id, path = %path, "Bypassing interceptor");
        let upstream_path = encode_path(&path);
        let response = forward(&state, parts, body, &upstream_path, None, &BTreeMap::new()).await;
        metrics::record_request("bypass", response.status().as_u16(), start_time);
        return response;
    }

    let interception = state.interceptor.handle(&view).await;

    let response = match response::terminal(&interception.intent.status) {
        Some(response) => response,
        None => {
            let upstream_path = encode_path(interception.upstream_path().unwrap_or(path.as_str()));
            let cookies =
                apply_mutations(view.cookies(), &interception.session.cookie_mutations, &path);
            forward(
                &state,
                parts,
                body,
                &upstream_path,
                Some(render_cookie_header(&cookies)),
                &interception.intent.headers,
            )
            .await
        }
    };
    let response = response::finish(response, &interception.intent);

    let status = response.status();
    metrics::record_request(interception.outcome.as_str(), status.as_u16(), start_time);
    tracing::debug!(
        request_id = %request_id,
        path = %path,
        outcome = interception.outcome.as_str(),
        status = %status,
        "Request handled"
    );

    response
}

/// Send the request to the renderer at `path`, which must already be encoded.
///
/// `cookie_header` replaces the client's `Cookie` header when given;
/// `extra_headers` are added to the forwarded request.
async fn forward(
    state: &AppState,
    parts: Parts,
    body: Body,
    path: &str,
    cookie_header: Option<String>,
    extra_headers: &BTreeMap<String, String>,
) -> Response {
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    let uri = match Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(state.upstream.as_ref())
        .path_and_query(path_and_query)
        .build()
    {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, path = %path, "Failed to build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    let mut headers = parts.headers;
    if let Some(cookies) = cookie_header {
        headers.remove(header::COOKIE);
        if !cookies.is_empty() {
            match HeaderValue::from_str(&cookies) {
                Ok(value) => {
                    headers.insert(header::COOKIE, value);
                }
                Err(_) => tracing::warn!("Refreshed cookies are not a valid header value"),
            }
        }
    }
    response::insert_headers(&mut headers, extra_headers);

    let mut upstream_request = Request::new(body);
    *upstream_request.method_mut() = parts.method;
    *upstream_request.uri_mut() = uri;
    *upstream_request.headers_mut() = headers;

    match state.client.request(upstream_request).await {
        Ok(upstream_response) => {
            let (parts, body) = upstream_response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(error = %e, path = %path, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
