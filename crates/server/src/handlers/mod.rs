//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `smartstay-server`.
//! The handlers are split into sub-modules by feature area.

pub mod ai_handlers;
pub mod analytics_handlers;
pub mod general;
pub mod recently_viewed_handlers;
pub mod report_handlers;
pub mod travel_handlers;
pub mod verification_handlers;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use ai_handlers::*;
pub use analytics_handlers::*;
pub use general::*;
pub use recently_viewed_handlers::*;
pub use report_handlers::*;
pub use travel_handlers::*;
pub use verification_handlers::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
use serde_json::Value;
use smartstay::{coerce, SupabaseClient};

/// Returns the Supabase client or the "not configured" error.
pub(crate) fn require_store(app_state: &AppState) -> Result<&SupabaseClient, AppError> {
    app_state
        .store
        .as_ref()
        .ok_or(AppError::NotConfigured("Supabase"))
}

/// Reads an identifier that the frontend may send as a string or a number.
pub(crate) fn id_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(coerce::text)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}
