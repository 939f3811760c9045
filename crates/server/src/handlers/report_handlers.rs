//! # Moderation Handlers
//!
//! Content reports raised by users and reviewed by admins.

use super::{require_store, AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{Map, Value};
use smartstay::store::{
    reports::{self, ReportFilter, ReportReview},
    Acknowledgement,
};
use tracing::info;

/// `GET /api/reports?status=..&content_type=..`
pub async fn list_reports_handler(
    State(app_state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Vec<Value>>, AppError> {
    let store = require_store(&app_state)?;
    Ok(Json(reports::list_reports(store, &filter).await?))
}

/// `POST /api/reports`
pub async fn create_report_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let store = require_store(&app_state)?;
    Ok(Json(reports::create_report(store, &payload).await?))
}

/// `POST /api/reports/{id}/review`
pub async fn review_report_handler(
    State(app_state): State<AppState>,
    Path(report_id): Path<String>,
    Json(payload): Json<ReportReview>,
) -> Result<Json<Acknowledgement>, AppError> {
    info!(%report_id, "Received report review");
    let store = require_store(&app_state)?;
    Ok(Json(reports::review_report(store, &report_id, &payload).await?))
}
