//! Health and cache management handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::AppState;
use marsbars_core::AnalysisBackend;

#[derive(Debug, Serialize)]
pub struct AiStatus {
    pub host: String,
    pub model: String,
    pub reachable: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// Absent when the AI backend is disabled
    pub ai: Option<AiStatus>,
    pub cache_entries: usize,
}

/// GET /api/health - Server status and AI backend reachability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ai = match state.analyzer.ai() {
        Some(client) => Some(AiStatus {
            host: client.host().to_string(),
            model: client.model().to_string(),
            reachable: client.health_check().await,
        }),
        None => None,
    };

    Json(HealthResponse {
        status: "ok",
        ai,
        cache_entries: state.analyzer.cache().len(),
    })
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub cleared: usize,
}

/// DELETE /api/cache - Drop all cached analysis results
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    let cleared = state.analyzer.cache().clear();
    info!(cleared, "Analysis cache cleared");
    Json(ClearCacheResponse { cleared })
}
