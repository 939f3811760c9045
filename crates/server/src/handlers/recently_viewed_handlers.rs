use super::{id_text, require_store, AppError, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use smartstay::store::{recently_viewed, Acknowledgement};

#[derive(Deserialize, Debug, Default)]
pub struct RecordViewRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub pg_id: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RecentViewsParams {
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

/// `POST /api/recently-viewed`
pub async fn record_view_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<RecordViewRequest>,
) -> Result<Json<Acknowledgement>, AppError> {
    let (Some(user_id), Some(pg_id)) = (
        id_text(payload.user_id.as_ref()),
        id_text(payload.pg_id.as_ref()),
    ) else {
        return Err(AppError::BadRequest(
            "user_id and pg_id are required".to_string(),
        ));
    };
    let store = require_store(&app_state)?;
    let ack = recently_viewed::record_view(store, &user_id, &pg_id, Utc::now()).await?;
    Ok(Json(ack))
}

/// `GET /api/recently-viewed?user_id=..&limit=..`
pub async fn list_recent_handler(
    State(app_state): State<AppState>,
    Query(params): Query<RecentViewsParams>,
) -> Result<Json<Vec<Value>>, AppError> {
    let user_id = params
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;
    let store = require_store(&app_state)?;
    let rows = recently_viewed::list_recent(store, &user_id, params.limit, Utc::now()).await?;
    Ok(Json(rows))
}
