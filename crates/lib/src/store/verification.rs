//! Owner verification documents.

use super::{require_fields, with_notes, Acknowledgement, Notification, PostgrestQuery, SupabaseClient};
use crate::{coerce, errors::StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

pub const VERIFICATION_BUCKET: &str = "verification-docs";
pub const DOCUMENTS_TABLE: &str = "verification_documents";
pub const PROFILES_TABLE: &str = "profiles";
pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";
pub const REQUIRED_DOCUMENT_FIELDS: [&str; 3] = ["owner_id", "document_type", "file_url"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadUrlRequest {
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTicket {
    pub file_path: String,
    pub upload_url: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    pub owner_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentReview {
    #[serde(default)]
    pub admin_id: Option<String>,
    /// `approved` or `rejected`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

/// Storage path for an uploaded document: unique per upload, grouped by owner.
pub fn verification_path(owner_id: &str, file_name: &str, now: DateTime<Utc>, token: &str) -> String {
    format!(
        "verification/{owner_id}/{}_{token}_{file_name}",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Whether `segment` can sit in a storage path and its URL unescaped.
pub fn is_safe_path_segment(segment: &str) -> bool {
    segment != "."
        && segment != ".."
        && !segment
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '#' | '?' | '%') || c.is_control())
}

/// Reserves a storage path for a verification document by creating an empty
/// placeholder object the frontend then overwrites.
pub async fn issue_upload_url(
    store: &SupabaseClient,
    request: &UploadUrlRequest,
    now: DateTime<Utc>,
) -> Result<UploadTicket, StoreError> {
    let (Some(owner_id), Some(file_name)) = (
        request.owner_id.as_deref().filter(|s| !s.trim().is_empty()),
        request.file_name.as_deref().filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(StoreError::Invalid("owner_id and file_name required".to_string()));
    };
    if !is_safe_path_segment(owner_id) || !is_safe_path_segment(file_name) {
        return Err(StoreError::Invalid(
            "owner_id and file_name contain unsupported characters".to_string(),
        ));
    }
    let content_type = request
        .content_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    let token = Uuid::new_v4().simple().to_string();
    let file_path = verification_path(owner_id, file_name, now, &token[..8]);
    store
        .create_object(VERIFICATION_BUCKET, &file_path, content_type)
        .await?;
    info!(owner_id, file_path = %file_path, "Issued verification upload path");

    Ok(UploadTicket {
        upload_url: store.object_url(VERIFICATION_BUCKET, &file_path),
        public_url: store.public_object_url(VERIFICATION_BUCKET, &file_path),
        file_path,
    })
}

pub async fn create_document(store: &SupabaseClient, document: &Map<String, Value>) -> Result<Value, StoreError> {
    require_fields(document, &REQUIRED_DOCUMENT_FIELDS)?;
    store
        .insert_one(DOCUMENTS_TABLE, &Value::Object(document.clone()))
        .await
}

pub async fn list_documents(store: &SupabaseClient, filter: &DocumentFilter) -> Result<Vec<Value>, StoreError> {
    let mut query = PostgrestQuery::new()
        .select("*,owner:profiles!owner_id(full_name)")
        .order("created_at", true);
    if let Some(owner_id) = filter.owner_id.as_deref().filter(|s| !s.is_empty()) {
        query = query.eq("owner_id", owner_id);
    }
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        query = query.eq("status", status);
    }
    store.select(DOCUMENTS_TABLE, &query).await
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Approves or rejects a document.
///
/// Marking the owner verified and notifying them are best effort once the
/// document itself has been updated.
pub async fn review_document(
    store: &SupabaseClient,
    document_id: &str,
    review: &DocumentReview,
) -> Result<Acknowledgement, StoreError> {
    let status = review.status.as_deref().map(str::trim);
    let admin_id = review.admin_id.as_deref().filter(|a| !a.trim().is_empty());
    let (Some(status @ ("approved" | "rejected")), Some(admin_id)) = (status, admin_id) else {
        return Err(StoreError::Invalid("Invalid status or missing admin_id".to_string()));
    };
    let notes = review.review_notes.as_deref().unwrap_or_default();

    let by_id = PostgrestQuery::new().eq("id", document_id);
    let document = store
        .select(DOCUMENTS_TABLE, &by_id)
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound("Document"))?;

    let update = json!({
        "status": status,
        "reviewed_by": admin_id,
        "review_notes": notes,
        "reviewed_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    store.update(DOCUMENTS_TABLE, &by_id, &update).await?;
    info!(document_id, status, "Verification document reviewed");

    let owner_id = document.get("owner_id").filter(|v| !v.is_null()).cloned();
    let Some(owner_id) = owner_id else {
        warn!(document_id, "Document has no owner. Skipping follow-ups.");
        return Ok(Acknowledgement::new(format!("Document {status}")));
    };

    if status == "approved" {
        let owner = PostgrestQuery::new().eq("id", coerce::text(&owner_id).unwrap_or_default());
        if let Err(e) = store
            .update(PROFILES_TABLE, &owner, &json!({ "is_verified": true }))
            .await
        {
            warn!(document_id, "Failed to mark owner as verified: {e}");
        }
    }

    let document_type = document
        .get("document_type")
        .and_then(Value::as_str)
        .unwrap_or("document");
    store
        .notify(&Notification {
            user_id: owner_id,
            kind: format!("verification_{status}"),
            title: format!("Document {}", capitalize(status)),
            message: with_notes(format!("Your {document_type} has been {status}."), notes),
            payload: json!({ "document_id": document_id }),
        })
        .await;

    Ok(Acknowledgement::new(format!("Document {status}")))
}
