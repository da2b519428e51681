//! Material solution lookup and form option handlers

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::AppError;
use marsbars_core::materials::{search, MaterialSolution, SustainabilityLevel};
use marsbars_core::{MATERIAL_TYPES, SOURCE_CATEGORIES};

/// Query parameters for material lookup
#[derive(Debug, Deserialize)]
pub struct MaterialsQuery {
    /// Substring of material, product or description
    #[serde(default)]
    pub q: String,
    /// all, high, medium or low
    pub level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MaterialsResponse {
    pub level: SustainabilityLevel,
    pub count: usize,
    pub materials: Vec<&'static MaterialSolution>,
}

/// GET /api/materials - Search the material solution catalog
pub async fn list_materials(
    Query(params): Query<MaterialsQuery>,
) -> Result<Json<MaterialsResponse>, AppError> {
    let level: SustainabilityLevel = params
        .level
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(|e: marsbars_core::Error| AppError::bad_request(&e.to_string()))?;

    let materials = search(&params.q, level);
    Ok(Json(MaterialsResponse {
        level,
        count: materials.len(),
        materials,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub material_types: &'static [&'static str],
    pub source_categories: &'static [&'static str],
}

/// GET /api/options - Material types and source categories for the entry form
pub async fn list_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        material_types: MATERIAL_TYPES,
        source_categories: SOURCE_CATEGORIES,
    })
}
