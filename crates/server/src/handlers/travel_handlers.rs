use super::{AppError, AppState};
use axum::{extract::State, Json};
use smartstay::routing::{TravelTimeReport, TravelTimeRequest};
use tracing::info;

/// `POST /api/ai/travel-time`
pub async fn travel_time_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<TravelTimeRequest>,
) -> Result<Json<TravelTimeReport>, AppError> {
    info!(
        by_address = payload.from_address.is_some() && payload.to_address.is_some(),
        "Received travel time request"
    );
    let report = app_state.routing.estimate(&payload).await?;
    Ok(Json(report))
}
