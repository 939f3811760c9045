//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The state is read-only once built: handlers
//! receive a clone of it for every request.

use crate::config::AppConfig;
use smartstay::{
    providers::{ai::AiProvider, factory::create_provider},
    RoutingClient, SupabaseClient,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The resolved configuration.
    pub config: Arc<AppConfig>,
    /// The text-generation provider, absent when no API key is configured.
    pub ai_provider: Option<Arc<dyn AiProvider>>,
    /// The Supabase client, absent when the URL or service key is missing.
    pub store: Option<SupabaseClient>,
    /// The routing client. Without a key it serves demo estimates.
    pub routing: RoutingClient,
}

impl AppState {
    /// The provider as the analysis functions take it.
    pub fn provider(&self) -> Option<&dyn AiProvider> {
        self.ai_provider.as_deref()
    }
}

/// Builds the shared application state from the configuration.
///
/// Missing credentials are not fatal: the affected endpoints answer with a
/// "not configured" error while the rest of the server keeps working.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider: Option<Arc<dyn AiProvider>> =
        create_provider(&config.provider_settings())?.map(Arc::from);
    build_app_state_with_provider(config, ai_provider)
}

/// Builds the state around an already constructed provider.
pub fn build_app_state_with_provider(
    config: AppConfig,
    ai_provider: Option<Arc<dyn AiProvider>>,
) -> anyhow::Result<AppState> {
    let store = match (&config.supabase_url, &config.supabase_service_key) {
        (Some(url), Some(key)) => Some(SupabaseClient::new(url.clone(), key.clone())?),
        _ => {
            warn!("Supabase not configured. Store-backed endpoints are disabled.");
            None
        }
    };
    let routing = RoutingClient::new(
        config.openroute_api_url.clone(),
        config.openroute_api_key.clone(),
    )?;

    info!(
        ai_provider = %config.ai_provider,
        ai_configured = ai_provider.is_some(),
        store_configured = store.is_some(),
        routing_configured = routing.is_configured(),
        "Application state built"
    );

    Ok(AppState {
        config: Arc::new(config),
        ai_provider,
        store,
        routing,
    })
}
