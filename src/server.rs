//! Web server for the earthquake map.
//!
//! Every page load runs the pipeline afresh:
//! - `GET /` fetches the feed and returns the Leaflet page
//! - `GET /markers.json` returns the rendered markers
//! - `GET /health` for liveness checks

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::client::FeedClient;
use crate::composer::MapConfig;
use crate::pipeline::{build_page, load_markers};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub feed_url: String,
    pub map: MapConfig,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    client: FeedClient,
    config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(client: FeedClient, config: ServerConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/markers.json", get(markers_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    config.map.validate()?;

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(FeedClient::new()?, config);
    let app = create_router(state);

    tracing::info!("🌍 quakemap serving at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Map page, rebuilt on every load.
async fn index_handler(State(state): State<AppState>) -> Response {
    match build_page(&state.client, &state.config.feed_url, &state.config.map).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!("failed to build map page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to build map: {e}")).into_response()
        }
    }
}

/// Rendered markers as JSON.
async fn markers_handler(State(state): State<AppState>) -> Response {
    match load_markers(&state.client, &state.config.feed_url).await {
        Ok(layer) => Json(layer).into_response(),
        Err(e) => {
            tracing::warn!("feed fetch failed: {e}");
            (StatusCode::BAD_GATEWAY, format!("feed unavailable: {e}")).into_response()
        }
    }
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "ok"
}
