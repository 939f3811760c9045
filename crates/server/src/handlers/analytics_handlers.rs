//! # Analytics Handlers
//!
//! Engagement counters for listings and the owner dashboard built from them.

use super::{id_text, require_store, AppError, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use smartstay::store::{
    metrics::{self, Dashboard, MetricKind, DEFAULT_DASHBOARD_DAYS},
    Acknowledgement,
};

#[derive(Deserialize, Debug, Default)]
pub struct IncrementRequest {
    #[serde(default)]
    pub pg_id: Option<Value>,
    #[serde(default)]
    pub metric: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DashboardParams {
    pub owner_id: Option<String>,
    pub days: Option<i64>,
}

/// `POST /api/analytics/increment`
pub async fn increment_metric_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<IncrementRequest>,
) -> Result<Json<Acknowledgement>, AppError> {
    let (Some(pg_id), Some(metric)) = (
        id_text(payload.pg_id.as_ref()),
        payload.metric.filter(|m| !m.trim().is_empty()),
    ) else {
        return Err(AppError::BadRequest("pg_id and metric required".to_string()));
    };
    let metric: MetricKind = metric.parse()?;
    let store = require_store(&app_state)?;
    let today = Utc::now().date_naive();
    Ok(Json(metrics::increment(store, &pg_id, metric, today).await?))
}

/// `GET /api/analytics/dashboard?owner_id=..&days=..`
pub async fn dashboard_handler(
    State(app_state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, AppError> {
    let owner_id = params
        .owner_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("owner_id required".to_string()))?;
    let store = require_store(&app_state)?;
    let days = params.days.unwrap_or(DEFAULT_DASHBOARD_DAYS);
    let today = Utc::now().date_naive();
    Ok(Json(metrics::dashboard(store, &owner_id, days, today).await?))
}
