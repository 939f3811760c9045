//! # Analytics Endpoint Tests

mod common;

use anyhow::Result;
use common::TestApp;
use httpmock::Method;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_increment_updates_an_existing_row() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    app.mock_server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/rest/v1/pg_metrics")
                .query_param("pg_id", "eq.pg-1");
            then.status(200)
                .json_body(json!([{"pg_id": "pg-1", "views": 4, "inquiries": 1}]));
        })
        .await;
    let patch = app
        .mock_server
        .mock_async(|when, then| {
            when.method(Method::PATCH)
                .path("/rest/v1/pg_metrics")
                .query_param("pg_id", "eq.pg-1")
                .json_body(json!({"views": 5}));
            then.status(204);
        })
        .await;

    // --- 2. Act ---
    let response = app
        .client
        .post(app.url("/api/analytics/increment"))
        .json(&json!({"pg_id": "pg-1", "metric": "views"}))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body, json!({"success": true, "message": "views incremented"}));
    patch.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_increment_creates_the_first_row_of_the_day() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/rest/v1/pg_metrics");
            then.status(200).json_body(json!([]));
        })
        .await;
    let insert = app
        .mock_server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/rest/v1/pg_metrics")
                .header("prefer", "resolution=merge-duplicates")
                .json_body_partial(r#"{"pg_id": "17", "saves": 1}"#);
            then.status(201);
        })
        .await;

    let body: Value = app
        .client
        .post(app.url("/api/analytics/increment"))
        .json(&json!({"pg_id": 17, "metric": "saves"}))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["message"], "saves incremented");
    insert.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_increment_rejects_unknown_metric() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .client
        .post(app.url("/api/analytics/increment"))
        .json(&json!({"pg_id": "pg-1", "metric": "likes"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Invalid metric type");

    let response = app
        .client
        .post(app.url("/api/analytics/increment"))
        .json(&json!({"metric": "views"}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "pg_id and metric required");
    Ok(())
}

#[tokio::test]
async fn test_dashboard_aggregates_owner_metrics() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    app.mock_server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/rest/v1/pg_listings")
                .query_param("owner_id", "eq.owner-1")
                .query_param("select", "id,name");
            then.status(200).json_body(json!([
                {"id": "pg-1", "name": "Green Nest"},
                {"id": "pg-2", "name": "Blue Haven"}
            ]));
        })
        .await;
    let metrics = app
        .mock_server
        .mock_async(|when, then| {
            when.method(Method::GET)
                .path("/rest/v1/pg_metrics")
                .query_param("pg_id", "in.(pg-1,pg-2)")
                .query_param("order", "date.desc");
            then.status(200).json_body(json!([
                {"pg_id": "pg-2", "date": "2024-06-02", "views": 9, "inquiries": 2, "saves": 1, "clicks": 3},
                {"pg_id": "pg-1", "date": "2024-06-01", "views": 4, "inquiries": 1, "saves": 0, "clicks": 1},
                {"pg_id": "pg-2", "date": "2024-06-01", "views": 1, "inquiries": 0, "saves": 2, "clicks": 0}
            ]));
        })
        .await;

    // --- 2. Act ---
    let body: Value = app
        .client
        .get(app.url("/api/analytics/dashboard?owner_id=owner-1&days=7"))
        .send()
        .await?
        .json()
        .await?;

    // --- 3. Assert ---
    assert_eq!(body["total_views"], 14);
    assert_eq!(body["total_inquiries"], 3);
    assert_eq!(body["total_saves"], 3);
    assert_eq!(body["total_clicks"], 4);
    assert_eq!(body["daily_metrics"][0]["date"], "2024-06-01");
    assert_eq!(body["daily_metrics"][0]["views"], 5);
    assert_eq!(body["daily_metrics"][1]["views"], 9);
    assert_eq!(body["top_performing"][0]["pg_name"], "Blue Haven");
    assert_eq!(body["top_performing"][0]["views"], 10);
    assert_eq!(body["top_performing"][1]["pg_id"], "pg-1");
    metrics.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_dashboard_for_owner_without_listings_is_empty() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/rest/v1/pg_listings");
            then.status(200).json_body(json!([]));
        })
        .await;

    let body: Value = app
        .client
        .get(app.url("/api/analytics/dashboard?owner_id=owner-9"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(
        body,
        json!({
            "total_views": 0,
            "total_inquiries": 0,
            "total_saves": 0,
            "total_clicks": 0,
            "daily_metrics": [],
            "top_performing": []
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_dashboard_requires_owner() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.client.get(app.url("/api/analytics/dashboard")).send().await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "owner_id required");
    Ok(())
}

#[tokio::test]
async fn test_dashboard_rejects_oversized_window() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let listings = app
        .mock_server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/rest/v1/pg_listings");
            then.status(200).json_body(json!([{"id": "pg-1", "name": "Green Nest"}]));
        })
        .await;

    // --- 2. Act ---
    let response = app
        .client
        .get(app.url("/api/analytics/dashboard?owner_id=owner-1&days=100000000"))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "days must be between 0 and 3650");
    assert_eq!(listings.hits_async().await, 0);
    Ok(())
}
