//! Waste analysis handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};
use marsbars_core::{Analysis, Error as CoreError, ReportSummary, WasteEntry};

/// Request body for an analysis
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub entries: Vec<WasteEntry>,
}

/// Analysis result plus the figures the results view charts
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub analysis: Analysis,
    pub summary: ReportSummary,
}

/// POST /api/analyze - Analyze a batch of waste entries
///
/// Model failures are answered with the fallback result and
/// `"source": "fallback"`; only invalid entries are rejected.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let analysis = match state.analyzer.analyze(&request.entries).await {
        Ok(analysis) => analysis,
        Err(CoreError::InvalidEntries(msg)) => return Err(AppError::bad_request(&msg)),
        Err(e) => return Err(e.into()),
    };

    info!(
        source = %analysis.source,
        key = %analysis.cache_key,
        entries = request.entries.len(),
        "Analysis served"
    );

    let summary = ReportSummary::build(&request.entries, &analysis.result);
    Ok(Json(AnalyzeResponse { analysis, summary }))
}

/// Error body for unknown API routes
pub async fn api_not_found() -> AppError {
    AppError::not_found("No such API endpoint")
}
