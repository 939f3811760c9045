//! # Server Endpoint Tests
//!
//! Health checks, CORS and the behaviour of the server when upstreams are
//! missing or the request body is unusable.

mod common;

use anyhow::Result;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::{json, Value};
use smartstay_server::handlers::HealthResponse;

#[tokio::test]
async fn test_root_and_health_check_endpoints() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;

    // --- Test Root Endpoint ---
    let root_response = app.client.get(app.url("/")).send().await?;
    assert!(root_response.status().is_success());
    assert_eq!("SmartStay backend is running", root_response.text().await?);

    // --- Test Liveness Endpoint ---
    let api_health: Value = app.client.get(app.url("/api/health")).send().await?.json().await?;
    assert_eq!(api_health, json!({"status": "ok"}));

    // --- Test Health Check Endpoint ---
    let health: HealthResponse = app.client.get(app.url("/health")).send().await?.json().await?;
    assert_eq!(
        health,
        HealthResponse {
            status: "healthy".to_string(),
            ai_provider_configured: true,
            ai_provider: "groq".to_string(),
            store_configured: true,
            routing_configured: true,
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_health_reports_missing_upstreams() -> Result<()> {
    let app = TestApp::spawn_with_config(|config| {
        config.groq_api_key = None;
        config.supabase_service_key = None;
        config.openroute_api_key = Some("your_openroute_api_key_here".to_string());
    })
    .await?;

    let health: HealthResponse = app.client.get(app.url("/health")).send().await?.json().await?;

    assert_eq!(health.status, "healthy");
    assert!(!health.ai_provider_configured);
    assert!(!health.store_configured);
    assert!(!health.routing_configured);
    Ok(())
}

#[tokio::test]
async fn test_store_endpoints_without_supabase_fail_cleanly() -> Result<()> {
    // Arrange
    let app = TestApp::spawn_with_config(|config| config.supabase_url = None).await?;

    // Act
    let response = app
        .client
        .post(app.url("/api/recently-viewed"))
        .json(&json!({"user_id": "u1", "pg_id": "pg1"}))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Supabase not configured");
    Ok(())
}

#[tokio::test]
async fn test_ai_endpoint_without_provider_fails_cleanly() -> Result<()> {
    let app = TestApp::spawn_with_config(|config| config.groq_api_key = None).await?;

    let response = app
        .client
        .post(app.url("/api/ai/hidden-charges"))
        .json(&json!({"rent": 8000}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "AI provider not configured");
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_rejected() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    // This JSON is syntactically invalid (missing closing brace).
    let malformed_body = r#"{"message": "hello""#;

    // Act
    let response = app
        .client
        .post(app.url("/api/ai/chatbot"))
        .header("Content-Type", "application/json")
        .body(malformed_body)
        .send()
        .await?;

    // Assert
    assert!(response.status().is_client_error());
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() -> Result<()> {
    let app = TestApp::spawn_with_config(|config| {
        config.frontend_url = Some("https://smartstay.example".to_string());
    })
    .await?;

    let response = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/ai/chatbot"))
        .header("Origin", "https://smartstay.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await?;

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://smartstay.example"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");

    let rejected = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/ai/chatbot"))
        .header("Origin", "https://evil.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await?;
    assert!(rejected
        .headers()
        .get("access-control-allow-origin")
        .is_none());
    Ok(())
}
