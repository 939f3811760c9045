//! Content moderation reports.

use super::{
    require_fields, with_notes, Acknowledgement, Notification, PostgrestQuery, SupabaseClient,
};
use crate::errors::StoreError;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

pub const REPORTS_TABLE: &str = "content_reports";
pub const LISTINGS_TABLE: &str = "pg_listings";
pub const REVIEWS_TABLE: &str = "reviews";
pub const REQUIRED_REPORT_FIELDS: [&str; 4] = ["reporter_id", "content_type", "content_id", "reason"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub status: Option<String>,
    pub content_type: Option<String>,
}

/// What an admin decided about a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    Resolve,
    Dismiss,
}

impl ReportAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action.trim() {
            "resolve" => Some(Self::Resolve),
            "dismiss" => Some(Self::Dismiss),
            _ => None,
        }
    }

    /// The report status and the word used in messages.
    pub fn status(self) -> &'static str {
        match self {
            Self::Resolve => "resolved",
            Self::Dismiss => "dismissed",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportReview {
    #[serde(default)]
    pub admin_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    /// `remove`, `warn` or `none`.
    #[serde(default)]
    pub content_action: Option<String>,
}

pub async fn list_reports(store: &SupabaseClient, filter: &ReportFilter) -> Result<Vec<Value>, StoreError> {
    let mut query = PostgrestQuery::new()
        .select("*,reporter:profiles!reporter_id(full_name)")
        .order("created_at", true);
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        query = query.eq("status", status);
    }
    if let Some(content_type) = filter.content_type.as_deref().filter(|s| !s.is_empty()) {
        query = query.eq("content_type", content_type);
    }
    store.select(REPORTS_TABLE, &query).await
}

pub async fn create_report(store: &SupabaseClient, report: &Map<String, Value>) -> Result<Value, StoreError> {
    require_fields(report, &REQUIRED_REPORT_FIELDS)?;
    let created = store
        .insert_one(REPORTS_TABLE, &Value::Object(report.clone()))
        .await?;
    let id = created.get("id").cloned().unwrap_or_default();
    info!(report_id = %id, "Content report created");
    Ok(created)
}

/// Records an admin decision on a report.
///
/// The status update is the primary write and its failure is returned. The
/// content removal and the reporter notification that follow are best effort.
pub async fn review_report(
    store: &SupabaseClient,
    report_id: &str,
    review: &ReportReview,
) -> Result<Acknowledgement, StoreError> {
    let (Some(action), Some(admin_id)) = (
        review.action.as_deref().filter(|a| !a.trim().is_empty()),
        review.admin_id.as_deref().filter(|a| !a.trim().is_empty()),
    ) else {
        return Err(StoreError::Invalid("action and admin_id required".to_string()));
    };
    let action = ReportAction::parse(action).ok_or_else(|| {
        StoreError::Invalid("action must be 'resolve' or 'dismiss'".to_string())
    })?;
    let notes = review.resolution_notes.as_deref().unwrap_or_default();

    let by_id = PostgrestQuery::new().eq("id", report_id);
    let report = store
        .select(REPORTS_TABLE, &by_id)
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound("Report"))?;

    let update = json!({
        "status": action.status(),
        "reviewed_by": admin_id,
        "resolution_notes": notes,
        "resolved_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    store.update(REPORTS_TABLE, &by_id, &update).await?;
    info!(report_id, status = action.status(), "Report reviewed");

    if action == ReportAction::Resolve && review.content_action.as_deref() == Some("remove") {
        remove_reported_content(store, &report).await;
    }

    if let Some(reporter_id) = report.get("reporter_id").filter(|v| !v.is_null()) {
        store
            .notify(&Notification {
                user_id: reporter_id.clone(),
                kind: "listing_flagged".to_string(),
                title: "Report Reviewed".to_string(),
                message: with_notes(
                    format!("Your report has been {}.", action.status()),
                    notes,
                ),
                payload: json!({ "report_id": report_id }),
            })
            .await;
    }

    Ok(Acknowledgement::new(format!(
        "Report {} successfully",
        action.status()
    )))
}

async fn remove_reported_content(store: &SupabaseClient, report: &Value) {
    let content_id = match report.get("content_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            warn!("Reported content has no id. Nothing removed.");
            return;
        }
    };
    let (table, patch) = match report.get("content_type").and_then(Value::as_str) {
        Some("listing") => (LISTINGS_TABLE, json!({ "status": "removed" })),
        Some("review") => (REVIEWS_TABLE, json!({ "is_flagged": true })),
        other => {
            warn!(content_type = ?other, "Unsupported content type. Nothing removed.");
            return;
        }
    };
    let query = PostgrestQuery::new().eq("id", &content_id);
    if let Err(e) = store.update(table, &query, &patch).await {
        warn!(table, content_id = %content_id, "Failed to remove reported content: {e}");
    }
}
