//! # Recently Viewed Endpoint Tests

mod common;

use anyhow::Result;
use common::{TestApp, SERVICE_KEY};
use httpmock::Method;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_record_view_upserts_the_pair() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let upsert = app
        .mock_server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/rest/v1/recently_viewed")
                .header("apikey", SERVICE_KEY)
                .header("prefer", "resolution=merge-duplicates")
                .json_body_partial(r#"{"user_id": "user-1", "pg_id": "42"}"#);
            then.status(201);
        })
        .await;

    // --- 2. Act ---
    let response = app
        .client
        .post(app.url("/api/recently-viewed"))
        .json(&json!({"user_id": "user-1", "pg_id": 42}))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"success": true, "message": "Added to recently viewed"}));
    upsert.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_record_view_requires_both_ids() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .post(app.url("/api/recently-viewed"))
        .json(&json!({"user_id": "user-1"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "user_id and pg_id are required");
    Ok(())
}

#[tokio::test]
async fn test_list_recent_clamps_the_limit() -> Result<()> {
    let app = TestApp::spawn().await?;
    let listing = app
        .mock_server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/rest/v1/recently_viewed")
                .query_param("user_id", "eq.user-1")
                .query_param("order", "viewed_at.desc")
                .query_param("limit", "50");
            then.status(200)
                .json_body(json!([{"pg_id": "42", "viewed_at": "2024-06-01T08:30:00Z"}]));
        })
        .await;

    let body: Value = app
        .client
        .get(app.url("/api/recently-viewed?user_id=user-1&limit=500"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body, json!([{"pg_id": "42", "viewed_at": "2024-06-01T08:30:00Z"}]));
    listing.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_list_recent_requires_user() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(app.url("/api/recently-viewed")).send().await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_store_rejection_keeps_its_status() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server
        .mock_async(|when, then| {
            when.method(Method::POST).path("/rest/v1/recently_viewed");
            then.status(409).body(r#"{"message":"violates foreign key constraint"}"#);
        })
        .await;

    let response = app
        .client
        .post(app.url("/api/recently-viewed"))
        .json(&json!({"user_id": "user-1", "pg_id": "missing"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], r#"{"message":"violates foreign key constraint"}"#);
    Ok(())
}
