//! # Supabase Gateway
//!
//! A small PostgREST and storage client plus the store-backed operations the
//! server exposes. Error responses are carried verbatim in
//! [`StoreError::Api`] so handlers can pass them through unchanged.

pub mod metrics;
pub mod recently_viewed;
pub mod reports;
pub mod verification;

use crate::{coerce, errors::StoreError};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const NOTIFICATIONS_TABLE: &str = "notifications";

/// The `Prefer` header sent with inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    /// Return the inserted rows.
    ReturnRepresentation,
    /// Upsert on the table's unique key.
    MergeDuplicates,
}

impl Prefer {
    pub fn header_value(self) -> &'static str {
        match self {
            Prefer::ReturnRepresentation => "return=representation",
            Prefer::MergeDuplicates => "resolution=merge-duplicates",
        }
    }
}

/// Query-string builder for PostgREST filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostgrestQuery {
    params: Vec<(String, String)>,
}

impl PostgrestQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }

    pub fn select(self, columns: &str) -> Self {
        self.push("select", columns.to_string())
    }

    pub fn eq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.push(column, format!("eq.{value}"))
    }

    pub fn gte(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.push(column, format!("gte.{value}"))
    }

    pub fn in_list<S: AsRef<str>>(self, column: &str, values: &[S]) -> Self {
        let joined = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        self.push(column, format!("in.({joined})"))
    }

    pub fn order(self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.push("order", format!("{column}.{direction}"))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.push("limit", limit.to_string())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// The acknowledgement returned by write-only operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// A notification row written after an admin action.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub user_id: Value,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub payload: Value,
}

/// A client for the Supabase REST and storage APIs, authenticated with the
/// service key.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    client: ReqwestClient,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: String, service_key: String) -> Result<Self, StoreError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(StoreError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// The authenticated URL an object is uploaded to.
    pub fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{bucket}/{path}", self.base_url)
    }

    /// The public download URL of an object.
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(StoreError::Request)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Supabase returned an error: {body}");
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Reads rows from `table`.
    pub async fn select(&self, table: &str, query: &PostgrestQuery) -> Result<Vec<Value>, StoreError> {
        let response = self
            .send(self.client.get(self.rest_url(table)).query(query.params()))
            .await?;
        response.json().await.map_err(StoreError::Deserialization)
    }

    /// Inserts `body` into `table`. Returns the rows Supabase sends back, which
    /// is empty unless `prefer` asks for a representation.
    pub async fn insert(&self, table: &str, body: &Value, prefer: Prefer) -> Result<Vec<Value>, StoreError> {
        let response = self
            .send(
                self.client
                    .post(self.rest_url(table))
                    .header("Prefer", prefer.header_value())
                    .json(body),
            )
            .await?;
        let text = response.text().await.map_err(StoreError::Deserialization)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(match serde_json::from_str::<Value>(&text)? {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            row => vec![row],
        })
    }

    /// Inserts `body` and returns the single created row.
    pub async fn insert_one(&self, table: &str, body: &Value) -> Result<Value, StoreError> {
        self.insert(table, body, Prefer::ReturnRepresentation)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::EmptyRepresentation(table.to_string()))
    }

    /// Patches every row of `table` matching `query`.
    pub async fn update(&self, table: &str, query: &PostgrestQuery, body: &Value) -> Result<(), StoreError> {
        self.send(
            self.client
                .patch(self.rest_url(table))
                .query(query.params())
                .header("Prefer", "return=minimal")
                .json(body),
        )
        .await?;
        Ok(())
    }

    /// Creates an empty placeholder object in a storage bucket.
    pub async fn create_object(&self, bucket: &str, path: &str, content_type: &str) -> Result<(), StoreError> {
        self.send(
            self.client
                .post(self.object_url(bucket, path))
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(Vec::new()),
        )
        .await?;
        Ok(())
    }

    /// Writes a notification row. Failures are logged and dropped.
    pub async fn notify(&self, notification: &Notification) {
        let result = match serde_json::to_value(notification) {
            Ok(body) => self
                .insert(NOTIFICATIONS_TABLE, &body, Prefer::ReturnRepresentation)
                .await
                .map(|_| ()),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(kind = %notification.kind, "Failed to send notification: {e}");
        }
    }
}

/// Names the fields of `required` that are missing, `null` or blank in `body`.
pub fn missing_fields<'a>(body: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| {
            !matches!(
                body.get(*field).and_then(coerce::text),
                Some(text) if !text.trim().is_empty()
            )
        })
        .collect()
}

/// Fails with "Missing required fields" unless every field is present.
pub(crate) fn require_fields(body: &Map<String, Value>, required: &[&str]) -> Result<(), StoreError> {
    let missing = missing_fields(body, required);
    if missing.is_empty() {
        Ok(())
    } else {
        debug!(?missing, "Rejecting record with missing fields");
        Err(StoreError::Invalid("Missing required fields".to_string()))
    }
}

/// Joins an action note onto a message, skipping an empty note.
pub(crate) fn with_notes(message: String, notes: &str) -> String {
    if notes.trim().is_empty() {
        message
    } else {
        format!("{message} {}", notes.trim())
    }
}
