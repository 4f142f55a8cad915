//! HTTP server implementation with range request support

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use library::{MediaLibrary, MediaRecord};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::ServerState;
use crate::stream::{serve, StreamResponse};

/// Query parameters of `GET /stream`
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    pub file: Option<String>,
}

/// File server API for managing the HTTP server
#[derive(Clone)]
pub struct FileServerApi {
    state: ServerState,
}

impl FileServerApi {
    /// Create a new file server API
    ///
    /// # Arguments
    /// * `library` - Media library to list and serve from
    pub fn new(library: MediaLibrary) -> Self {
        Self {
            state: ServerState::new(library),
        }
    }

    /// Get the server state
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Create the axum router with all routes configured
    pub fn router(&self) -> Router {
        Router::new()
            .route("/media", get(list_media))
            .route("/stream", get(stream_file))
            .route("/health", get(health_check))
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the file server
    ///
    /// # Arguments
    /// * `host` - Host to bind to (e.g., "0.0.0.0")
    /// * `port` - Port to bind to (e.g., 8081)
    pub async fn serve(self, host: &str, port: u16) -> crate::Result<()> {
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!(
            "File server listening on {} serving {}",
            addr,
            self.state.media_root().display()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("File server stopped");
        Ok(())
    }
}

/// Resolve once Ctrl+C is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Health check endpoint
async fn health_check(State(state): State<ServerState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        format!(
            "File server running. Media root: {}",
            state.media_root().display()
        ),
    )
}

/// List every media file in the library
async fn list_media(State(state): State<ServerState>) -> Result<Json<Vec<MediaRecord>>, AppError> {
    let records = state.library().list_media().await?;
    Ok(Json(records))
}

/// Stream file handler with range request support
async fn stream_file(
    State(state): State<ServerState>,
    Query(params): Query<StreamParams>,
    headers: HeaderMap,
) -> Result<StreamResponse, AppError> {
    let filename = params
        .file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::MissingParameter("File not specified".to_string()))?;

    let path = state.resolver().resolve(&filename).await?;

    let range = headers
        .get(header::RANGE)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::BadRange("Invalid range header".to_string()))
        })
        .transpose()?;

    serve(&path, range, state.formats()).await
}
