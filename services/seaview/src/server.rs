//! HTTP server for pipeline status.
//!
//! Provides endpoints for:
//! - Loading flag and the currently published generation
//! - Summary of the published glyph batches and a speed legend
//! - Liveness checks

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use field_pipeline::Pipeline;
use field_sampler::BatchSummary;
use seaview_common::{GradientConfig, LegendEntry};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use visus_client::QueryDescriptor;

/// Number of swatches in the status legend.
const LEGEND_STEPS: usize = 5;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub loading: bool,
    pub generation: u64,
    pub query: Option<QueryDescriptor>,
    pub summary: Option<BatchSummary>,
    pub legend: Vec<LegendEntry>,
}

// ============================================================================
// Shared State
// ============================================================================

pub struct ServerState {
    pub pipeline: Arc<Pipeline>,
    pub gradient: Arc<GradientConfig>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the status API router.
pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /status - Loading flag and published batch summary
async fn status_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    Json(build_status(&state))
}

/// GET /health - Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

fn build_status(state: &ServerState) -> StatusResponse {
    let published = state.pipeline.latest();
    let summary = published.batches.as_ref().map(|b| b.summary());
    let legend = summary
        .map(|s| state.gradient.legend(s.max_magnitude, LEGEND_STEPS))
        .unwrap_or_default();

    StatusResponse {
        service: "seaview".to_string(),
        loading: state.pipeline.is_loading(),
        generation: published.generation,
        query: published.query,
        summary,
        legend,
    }
}

// ============================================================================
// Server
// ============================================================================

pub async fn run_server(state: Arc<ServerState>, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port = port, "Starting status server");

    let listener = TcpListener::bind(addr).await?;
    serve(state, listener).await
}

pub async fn serve(state: Arc<ServerState>, listener: TcpListener) -> anyhow::Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
