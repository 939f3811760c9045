//! # General Route Handlers
//!
//! The root banner and the two health checks.

use super::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub ai_provider_configured: bool,
    pub ai_provider: String,
    pub store_configured: bool,
    pub routing_configured: bool,
}

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "SmartStay backend is running"
}

/// The handler for the liveness check (`/api/health`).
pub async fn api_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The handler for `/health`, which also reports which upstreams are configured.
pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        ai_provider_configured: app_state.ai_provider.is_some(),
        ai_provider: app_state.config.ai_provider.clone(),
        store_configured: app_state.store.is_some(),
        routing_configured: app_state.routing.is_configured(),
    })
}
