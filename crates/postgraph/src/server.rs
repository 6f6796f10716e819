//! HTTP endpoints for the graph view and backlink panels.
//!
//! - `GET /graph.json` - the full node/link dataset
//! - `GET /backlinks/{id}` - documents linking to `id` (ids may contain `/`)

use crate::site::{BacklinksReport, Site};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use postgraph_core::{Error, Result};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    site: Arc<Site>,
}

/// Error body: `{"error": "..."}`
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn router(site: Arc<Site>) -> Router {
    Router::new()
        .route("/graph.json", get(graph_json))
        .route("/backlinks/*id", get(backlinks))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { site })
}

async fn graph_json(State(state): State<AppState>) -> std::result::Result<Response, ApiError> {
    let body = state.site.graph().to_json()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn backlinks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<BacklinksReport>, ApiError> {
    Ok(Json(state.site.backlinks(&id)?))
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn serve(
    site: Arc<Site>,
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(Error::io)?;
    let addr = listener.local_addr().map_err(Error::io)?;

    log::info!("Serving {} documents on http://{}", site.corpus().len(), addr);

    axum::serve(listener, router(site).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(Error::io)?;

    log::info!("Server shut down");
    Ok(())
}

/// Resolves on ctrl-c.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
