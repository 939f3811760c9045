//! # Verification Handlers
//!
//! Owner document uploads and their admin review.

use super::{require_store, AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{Map, Value};
use smartstay::store::{
    verification::{self, DocumentFilter, DocumentReview, UploadTicket, UploadUrlRequest},
    Acknowledgement,
};
use tracing::info;

/// `POST /api/verification/upload-url`
pub async fn upload_url_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<UploadUrlRequest>,
) -> Result<Json<UploadTicket>, AppError> {
    let store = require_store(&app_state)?;
    let ticket = verification::issue_upload_url(store, &payload, Utc::now()).await?;
    Ok(Json(ticket))
}

/// `POST /api/verification/documents`
pub async fn create_document_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let store = require_store(&app_state)?;
    Ok(Json(verification::create_document(store, &payload).await?))
}

/// `GET /api/verification/documents?owner_id=..&status=..`
pub async fn list_documents_handler(
    State(app_state): State<AppState>,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Vec<Value>>, AppError> {
    let store = require_store(&app_state)?;
    Ok(Json(verification::list_documents(store, &filter).await?))
}

/// `POST /api/verification/documents/{id}/review`
pub async fn review_document_handler(
    State(app_state): State<AppState>,
    Path(document_id): Path<String>,
    Json(payload): Json<DocumentReview>,
) -> Result<Json<Acknowledgement>, AppError> {
    info!(%document_id, "Received document review");
    let store = require_store(&app_state)?;
    Ok(Json(
        verification::review_document(store, &document_id, &payload).await?,
    ))
}
