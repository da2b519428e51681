//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use marsbars_core::{MockBackend, MockReply};
use std::time::Duration;
use tower::ServiceExt;

fn test_state(mock: Option<MockBackend>) -> AppState {
    let mut config = AppConfig::embedded().unwrap();
    config.server.allowed_origins = vec![];
    let analyzer = WasteAnalyzer::new(
        mock.map(AIClient::Mock),
        Arc::new(ResultCache::new()),
        &mut PromptLibrary::embedded_only(),
        Duration::from_secs(5),
    )
    .unwrap();
    AppState { analyzer, config }
}

fn setup_test_app() -> Router {
    create_router(test_state(Some(MockBackend::new())), None)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn pet_batch() -> serde_json::Value {
    serde_json::json!({
        "entries": [
            {"id": "1", "materialType": "Plastics (PET)", "quantity": 10, "sourceCategory": "Life Support Systems"}
        ]
    })
}

// ========== Analysis API Tests ==========

#[tokio::test]
async fn test_analyze_uses_model_then_cache() {
    let mock = MockBackend::new();
    let app = create_router(test_state(Some(mock.clone())), None);

    let response = app
        .clone()
        .oneshot(post_json("/api/analyze", &pet_batch()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = get_body_json(response).await;
    assert_eq!(first["source"], "model");
    assert_eq!(first["result"]["efficiency"], 86.0);
    assert_eq!(first["totalQuantity"], 10.0);
    assert!(first.get("fallbackReason").is_none());
    assert_eq!(first["summary"]["byMaterial"][0]["label"], "Plastics (PET)");

    let response = app
        .oneshot(post_json("/api/analyze", &pet_batch()))
        .await
        .unwrap();
    let second = get_body_json(response).await;
    assert_eq!(second["source"], "cache");
    assert_eq!(second["result"], first["result"]);
    assert_eq!(second["cacheKey"], first["cacheKey"]);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_analyze_falls_back_on_bad_reply() {
    let mock = MockBackend::with_reply(MockReply::Text("{\"outputs\": []}".into()));
    let app = create_router(test_state(Some(mock)), None);

    let response = app
        .oneshot(post_json("/api/analyze", &pet_batch()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["source"], "fallback");
    assert!(json["fallbackReason"].as_str().unwrap().contains("resourceUsage"));
    assert_eq!(json["result"]["resourceUsage"]["energy"], 22.0);
    assert!(json["result"]["outputs"][0]["productType"]
        .as_str()
        .unwrap()
        .contains("3D Printing Filament"));
}

#[tokio::test]
async fn test_analyze_without_ai_uses_fallback() {
    let app = create_router(test_state(None), None);

    let body = serde_json::json!({
        "entries": [
            {"materialType": "Aluminum", "quantity": 5, "sourceCategory": "Research Equipment", "contamination": ""}
        ]
    });
    let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["result"]["resourceUsage"]["energy"], 14.0);
}

#[tokio::test]
async fn test_analyze_rejects_empty_entries() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/analyze", &serde_json::json!({"entries": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("at least one"));
}

#[tokio::test]
async fn test_analyze_rejects_zero_quantity() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "entries": [
            {"materialType": "Fabrics", "quantity": 0, "sourceCategory": "Cosmic Celebrations"}
        ]
    });
    let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_rejects_oversized_quantity() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "entries": [
            {"materialType": "Aluminum", "quantity": 1e308, "sourceCategory": "Research Equipment"}
        ]
    });
    let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_analyze_retries_unreachable_model() {
    let mock = MockBackend::with_reply(MockReply::Error("connection refused".into()));
    let app = create_router(test_state(Some(mock.clone())), None);

    for _ in 0..2 {
        let json = get_body_json(
            app.clone()
                .oneshot(post_json("/api/analyze", &pet_batch()))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(json["source"], "fallback");
    }
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_analyze_rejects_malformed_body() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/analyze", &serde_json::json!({"waste": 3})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json.get("error").is_some());
}

// ========== Export API Tests ==========

#[tokio::test]
async fn test_export_returns_attachment() {
    let app = setup_test_app();

    let analyzed = get_body_json(
        app.clone()
            .oneshot(post_json("/api/analyze", &pet_batch()))
            .await
            .unwrap(),
    )
    .await;

    let body = serde_json::json!({
        "entries": pet_batch()["entries"],
        "results": analyzed["result"],
    });
    let response = app.oneshot(post_json("/api/export", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"mars-recycling-report-"));
    assert!(disposition.ends_with(".json\""));

    let json = get_body_json(response).await;
    assert_eq!(json["results"], analyzed["result"]);
    assert_eq!(json["wasteInputs"][0]["materialType"], "Plastics (PET)");
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_export_requires_results() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/export", &pet_batch()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Materials and Options API Tests ==========

#[tokio::test]
async fn test_materials_search() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/materials?q=cotton&level=high"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["level"], "high");
    assert_eq!(json["count"], 3);
    assert!(json["materials"][0]["inputMaterial"]
        .as_str()
        .unwrap()
        .contains("Cotton"));
}

#[tokio::test]
async fn test_materials_default_lists_catalog() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/materials")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["count"], 12);
}

#[tokio::test]
async fn test_materials_rejects_unknown_level() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/materials?level=extreme"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_options() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/options")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["materialTypes"].as_array().unwrap().len(), 14);
    assert_eq!(json["sourceCategories"][3], "Life Support Systems");
}

// ========== System API Tests ==========

#[tokio::test]
async fn test_health_reports_ai_and_cache() {
    let app = setup_test_app();

    app.clone()
        .oneshot(post_json("/api/analyze", &pet_batch()))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ai"]["model"], "mock");
    assert_eq!(json["ai"]["reachable"], true);
    assert_eq!(json["cacheEntries"], 1);
}

#[tokio::test]
async fn test_health_without_ai() {
    let app = create_router(test_state(None), None);

    let json = get_body_json(app.oneshot(get("/api/health")).await.unwrap()).await;
    assert!(json["ai"].is_null());
}

#[tokio::test]
async fn test_clear_cache_forces_new_model_call() {
    let mock = MockBackend::new();
    let app = create_router(test_state(Some(mock.clone())), None);

    app.clone()
        .oneshot(post_json("/api/analyze", &pet_batch()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["cleared"], 1);

    let json = get_body_json(
        app.oneshot(post_json("/api/analyze", &pet_batch()))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["source"], "model");
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/recyclers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/options")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}
