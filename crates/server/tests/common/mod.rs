//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `smartstay-server`
//! integration tests.
//!
//! - `TestApp`: A full application harness that spawns a real server on a random port.
//!   Supabase, OpenRouteService and Groq are all pointed at one `httpmock::MockServer`,
//!   so a test stubs whichever upstream it exercises.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use reqwest::Client;
use smartstay::AiProvider;
use smartstay_server::{
    config::AppConfig,
    router,
    state::{build_app_state, build_app_state_with_provider, AppState},
};
use smartstay_test_utils::MockAiProvider;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, task::JoinHandle};

pub const SERVICE_KEY: &str = "test-service-key";
pub const ROUTING_KEY: &str = "test-routing-key";
pub const GROQ_PATH: &str = "/openai/v1/chat/completions";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// A configuration whose upstreams all live on `mock_server`.
pub fn mock_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        port: 0,
        groq_api_key: Some("test-groq-key".to_string()),
        groq_api_url: mock_server.url(GROQ_PATH),
        supabase_url: Some(mock_server.base_url()),
        supabase_service_key: Some(SERVICE_KEY.to_string()),
        openroute_api_key: Some(ROUTING_KEY.to_string()),
        openroute_api_url: mock_server.base_url(),
        ..Default::default()
    }
}

impl TestApp {
    /// Spawns the server with every upstream configured against the mock server.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let config = mock_config(&mock_server);
        let app_state = build_app_state(config).await?;
        Self::spawn_with_state(app_state, mock_server).await
    }

    /// Spawns the server with a scripted AI provider in place of Groq.
    pub async fn spawn_with_provider(provider: MockAiProvider) -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let config = mock_config(&mock_server);
        let provider: Arc<dyn AiProvider> = Arc::new(provider);
        let app_state = build_app_state_with_provider(config, Some(provider))?;
        Self::spawn_with_state(app_state, mock_server).await
    }

    /// Spawns the server with a configuration derived from the mock defaults.
    pub async fn spawn_with_config(adjust: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let mut config = mock_config(&mock_server);
        adjust(&mut config);
        let app_state = build_app_state(config).await?;
        Self::spawn_with_state(app_state, mock_server).await
    }

    pub async fn spawn_with_state(app_state: AppState, mock_server: MockServer) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Wraps `content` in the Groq chat-completions response envelope.
pub fn groq_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}
