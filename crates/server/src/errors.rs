use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use smartstay::{PromptError, RoutingError, StoreError};
use tracing::error;

/// A custom error type for the server application.
///
/// Each variant maps to a status code and an `{"error": message}` body.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the text-generation provider or the gateway.
    Prompt(PromptError),
    /// Errors from the Supabase gateway.
    Store(StoreError),
    /// Errors from the routing and geocoding client.
    Routing(RoutingError),
    /// Missing or invalid request input.
    BadRequest(String),
    /// An upstream service without credentials, e.g. `"Supabase"`.
    NotConfigured(&'static str),
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<RoutingError> for AppError {
    fn from(err: RoutingError) -> Self {
        AppError::Routing(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Prompt(err) => {
                error!("PromptError: {:?}", err);
                match err {
                    // The provider's own text is what the frontend shows.
                    PromptError::AiApi(text) => (StatusCode::INTERNAL_SERVER_ERROR, text),
                    other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
                }
            }
            AppError::Store(err) => {
                error!("StoreError: {:?}", err);
                match err {
                    StoreError::Api { status, body } => (
                        StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                        body,
                    ),
                    StoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                    StoreError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
                    other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
                }
            }
            AppError::Routing(err) => {
                error!("RoutingError: {:?}", err);
                match err {
                    RoutingError::CouldNotLocate(_) | RoutingError::MissingCoordinates(_) => {
                        (StatusCode::BAD_REQUEST, err.to_string())
                    }
                    other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
                }
            }
            AppError::BadRequest(message) => {
                error!("Bad request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotConfigured(service) => {
                error!("{service} is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{service} not configured"),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
