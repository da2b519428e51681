//! Mars Bars Web Server
//!
//! Axum-based REST API for the Mars waste recycling analyzer.
//!
//! - Waste analysis with session caching and deterministic fallback
//! - Report export as a JSON attachment
//! - Material solution lookup
//! - Restrictive CORS policy and security headers
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use marsbars_core::{AIClient, AnalysisBackend, AppConfig, PromptLibrary, ResultCache, WasteAnalyzer};

mod handlers;

/// Shared application state
pub struct AppState {
    pub analyzer: WasteAnalyzer,
    pub config: AppConfig,
}

impl AppState {
    /// Build the analyzer from configuration with a fresh session cache
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let ai = AIClient::from_config(&config.ai)?;
        let mut prompts = PromptLibrary::new();
        let analyzer = WasteAnalyzer::new(
            ai,
            Arc::new(ResultCache::new()),
            &mut prompts,
            config.ai.timeout(),
        )?;
        Ok(Self { analyzer, config })
    }
}

/// Create the application router
pub fn create_router(state: AppState, static_dir: Option<&str>) -> Router {
    match state.analyzer.ai() {
        Some(client) => info!(host = client.host(), model = client.model(), "AI backend configured"),
        None => info!("AI backend disabled, analyses use the fallback generator"),
    }

    let cors = build_cors(&state.config.server.allowed_origins);
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/export", post(handlers::export_report))
        .route("/materials", get(handlers::list_materials))
        .route("/options", get(handlers::list_options))
        .route("/health", get(handlers::health))
        .route("/cache", delete(handlers::clear_cache))
        .fallback(handlers::api_not_found);

    // CSP: same-origin scripts, inline styles for the frontend bundle
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    if allowed_origins.is_empty() {
        // Same-origin only
        return cors;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(origins)
}

/// Start the server on the configured host and port
pub async fn serve(config: AppConfig, static_dir: Option<&str>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config)?;

    check_ai_connection(&state).await;

    let app = create_router(state, static_dir);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend reachability
async fn check_ai_connection(state: &AppState) {
    if let Some(client) = state.analyzer.ai() {
        if client.health_check().await {
            info!(host = client.host(), model = client.model(), "AI backend reachable");
        } else {
            warn!(
                host = client.host(),
                "AI backend configured but not responding, analyses will fall back"
            );
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Generic message to the client, full error to the log
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}

#[cfg(test)]
mod tests;
