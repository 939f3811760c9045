//! # AI Route Handlers
//!
//! Thin wrappers around the analyses in `smartstay::analysis`. Provider
//! failures become 500s; unusable model output has already been replaced by
//! the shape's fallback.

use super::{AppError, AppState};
use axum::{extract::State, Json};
use smartstay::analysis::{
    chatbot::{chat, ChatReply, ChatRequest},
    description::{generate_description, DescriptionRequest, GeneratedDescription},
    hidden_charges::{detect_hidden_charges, HiddenChargeReport, ListingCharges},
    recommendations::{recommend, RecommendationList, RecommendationRequest},
    sentiment::{analyze_sentiment, SentimentRequest, SentimentSummary},
};
use tracing::info;

/// `POST /api/ai/sentiment-analysis`
pub async fn sentiment_analysis_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SentimentRequest>,
) -> Result<Json<SentimentSummary>, AppError> {
    info!(reviews = payload.reviews.len(), "Received sentiment analysis request");
    let summary = analyze_sentiment(app_state.provider(), &payload).await?;
    Ok(Json(summary))
}

/// `POST /api/ai/hidden-charges`
pub async fn hidden_charges_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ListingCharges>,
) -> Result<Json<HiddenChargeReport>, AppError> {
    info!("Received hidden charges request");
    let report = detect_hidden_charges(app_state.provider(), &payload).await?;
    Ok(Json(report))
}

/// `POST /api/ai/generate-description`
pub async fn generate_description_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<DescriptionRequest>,
) -> Result<Json<GeneratedDescription>, AppError> {
    info!("Received description generation request");
    let generated = generate_description(app_state.provider(), &payload).await?;
    Ok(Json(generated))
}

/// `POST /api/ai/personalized-recommendations`
pub async fn recommendations_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<Json<RecommendationList>, AppError> {
    info!(
        candidates = payload.available_pgs.len(),
        "Received recommendations request"
    );
    let list = recommend(app_state.provider(), &payload).await?;
    Ok(Json(list))
}

/// `POST /api/ai/chatbot`
pub async fn chatbot_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    if payload.message().is_none() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }
    info!("Received chatbot message");
    let reply = chat(app_state.provider(), &payload).await?;
    Ok(Json(reply))
}
