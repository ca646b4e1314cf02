//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router from the route entries
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Forward matched requests to CouchDB and render the result

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::couch::{CouchClient, Forwarder, RequestOptions};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::{not_found, outcome_response};
use crate::render::TemplateEngine;
use crate::routing::{routes_from_config, RouteEntry};

/// State of one registered route.
#[derive(Clone)]
pub struct RouteState {
    pub forwarder: Forwarder,
    pub options: Arc<RequestOptions>,
    pub engine: Arc<TemplateEngine>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        Self::with_client(config, CouchClient::new())
    }

    /// Create a server that forwards through `client`.
    pub fn with_client(config: RelayConfig, client: CouchClient) -> Self {
        let config = Arc::new(config);
        let engine = Arc::new(TemplateEngine::new(&config.templates));
        let entries = routes_from_config(&config);
        let router = Self::build_router(&config, &entries, client, engine);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &RelayConfig,
        entries: &[RouteEntry],
        client: CouchClient,
        engine: Arc<TemplateEngine>,
    ) -> Router {
        let defaults = Arc::new(config.couch.clone());
        let mut router = Router::new();

        for entry in entries {
            let state = RouteState {
                forwarder: Forwarder::new(
                    entry.doc_type,
                    client.clone(),
                    defaults.clone(),
                    config.templates.namespace.clone(),
                ),
                options: Arc::new(entry.options.clone()),
                engine: engine.clone(),
            };
            tracing::debug!(pattern = %entry.pattern, doc_type = %entry.doc_type, "Registering route");
            router = router.route(&entry.pattern, get(relay_handler).with_state(state));
        }

        let fallback_engine = engine.clone();
        router
            .fallback(move |uri: Uri| async move { not_found(&fallback_engine, uri.path()) })
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request.headers()),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        Duration::from_secs(config.timeouts.request_secs),
                    )),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Forwards `/<type>/<name>` to CouchDB and renders the result.
async fn relay_handler(
    State(state): State<RouteState>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
    uri: Uri,
) -> Response {
    let doc_type = state.forwarder.doc_type();
    match state.forwarder.handle(&name, &state.options, query.as_deref()).await {
        Ok(outcome) => outcome_response(&state.engine, outcome, uri.path()),
        Err(e) => {
            tracing::error!(doc_type = %doc_type, name = %name, error = %e, "Request forwarding failed");
            e.into_response()
        }
    }
}
