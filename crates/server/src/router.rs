use super::{handlers, state::AppState};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.cors_origins());

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::api_health))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/ai/sentiment-analysis",
            post(handlers::sentiment_analysis_handler),
        )
        .route("/api/ai/hidden-charges", post(handlers::hidden_charges_handler))
        .route("/api/ai/travel-time", post(handlers::travel_time_handler))
        .route(
            "/api/ai/generate-description",
            post(handlers::generate_description_handler),
        )
        .route(
            "/api/ai/personalized-recommendations",
            post(handlers::recommendations_handler),
        )
        .route("/api/ai/chatbot", post(handlers::chatbot_handler))
        .route(
            "/api/recently-viewed",
            post(handlers::record_view_handler).get(handlers::list_recent_handler),
        )
        .route(
            "/api/reports",
            get(handlers::list_reports_handler).post(handlers::create_report_handler),
        )
        .route(
            "/api/reports/{id}/review",
            post(handlers::review_report_handler),
        )
        .route(
            "/api/verification/upload-url",
            post(handlers::upload_url_handler),
        )
        .route(
            "/api/verification/documents",
            post(handlers::create_document_handler).get(handlers::list_documents_handler),
        )
        .route(
            "/api/verification/documents/{id}/review",
            post(handlers::review_document_handler),
        )
        .route(
            "/api/analytics/increment",
            post(handlers::increment_metric_handler),
        )
        .route("/api/analytics/dashboard", get(handlers::dashboard_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Allows the configured frontend origins, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
