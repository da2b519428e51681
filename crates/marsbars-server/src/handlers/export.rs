//! Report export handler

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::{header, Response, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::AppError;
use marsbars_core::{ExportReport, RecyclingResult, WasteEntry};

/// Request body for an export
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub entries: Vec<WasteEntry>,
    pub results: RecyclingResult,
}

/// POST /api/export - Download the entries and result as a JSON report
pub async fn export_report(
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response<Body>, AppError> {
    let Json(request) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let report = ExportReport::new(request.entries, request.results);
    let filename = report.filename();
    let json = report.to_json_pretty()?;

    info!(file = %filename, entries = report.waste_inputs.len(), "Report exported");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(json))
        .map_err(|e| AppError::internal(&e.to_string()))
}
