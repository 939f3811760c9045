//! # Application Configuration
//!
//! This module defines the configuration structure for the `smartstay-server`
//! and the logic for loading it. Values are layered: programmatic defaults, an
//! optional `config.yml` (with `${VAR}` substitution), plain environment
//! variables such as `PORT` or `GROQ_API_KEY`, and finally `SMARTSTAY_...`
//! overrides.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use smartstay::{
    providers::{
        ai::{
            gemini::{gemini_api_url, DEFAULT_GEMINI_MODEL},
            groq::{DEFAULT_GROQ_API_URL, DEFAULT_GROQ_MODEL},
        },
        factory::ProviderSettings,
    },
    routing::DEFAULT_OPENROUTE_API_URL,
};
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// Local dev servers plus the deployed frontend.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:8080",
    "http://localhost:5173",
    "https://smartstay-ruddy.vercel.app",
];

/// The root configuration structure.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT`.
    pub port: u16,
    /// `groq` or `gemini`. Loaded from `AI_PROVIDER`.
    pub ai_provider: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_api_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Derived from `gemini_model` when absent.
    pub gemini_api_url: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub openroute_api_key: Option<String>,
    pub openroute_api_url: String,
    /// Appended to `allowed_origins` when set.
    pub frontend_url: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            ai_provider: "groq".to_string(),
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_url: None,
            supabase_url: None,
            supabase_service_key: None,
            openroute_api_key: None,
            openroute_api_url: DEFAULT_OPENROUTE_API_URL.to_string(),
            frontend_url: None,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// The settings for the selected text-generation provider.
    pub fn provider_settings(&self) -> ProviderSettings {
        match self.ai_provider.as_str() {
            "gemini" => ProviderSettings {
                provider: "gemini".to_string(),
                api_key: self.gemini_api_key.clone(),
                api_url: Some(
                    self.gemini_api_url
                        .clone()
                        .unwrap_or_else(|| gemini_api_url(&self.gemini_model)),
                ),
                model: Some(self.gemini_model.clone()),
            },
            other => ProviderSettings {
                provider: other.to_string(),
                api_key: self.groq_api_key.clone(),
                api_url: Some(self.groq_api_url.clone()),
                model: Some(self.groq_model.clone()),
            },
        }
    }

    /// Every origin CORS should accept.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = self.allowed_origins.clone();
        if let Some(frontend) = &self.frontend_url {
            if !origins.contains(frontend) {
                origins.push(frontend.clone());
            }
        }
        origins
    }

    /// Treats blank secrets and URLs as absent.
    fn normalize(mut self) -> Self {
        self.ai_provider = self.ai_provider.trim().to_lowercase();
        self.groq_api_key = non_blank(self.groq_api_key);
        self.gemini_api_key = non_blank(self.gemini_api_key);
        self.gemini_api_url = non_blank(self.gemini_api_url);
        self.supabase_url = non_blank(self.supabase_url);
        self.supabase_service_key = non_blank(self.supabase_service_key);
        self.openroute_api_key = non_blank(self.openroute_api_key);
        self.frontend_url = non_blank(self.frontend_url);
        self
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// - Without an override, `config.yml` next to the server manifest is used if it
///   exists. An explicit override path must exist.
/// - Top-level keys are overridden by plain variables (`PORT`, `GROQ_API_KEY`,
///   `ALLOWED_ORIGINS` as a comma-separated list, ...).
/// - `SMARTSTAY_...` variables override last (e.g. `SMARTSTAY_PORT`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    // Layer 1: Optional YAML file.
    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        // Layer 2: Environment variables for top-level keys like PORT.
        .add_source(
            Environment::default()
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("allowed_origins"),
        )
        // Layer 3: Prefixed environment variables for explicit overrides.
        .add_source(
            Environment::with_prefix("SMARTSTAY")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("allowed_origins"),
        )
        .build()?;

    // Deserialize the fully resolved configuration; missing keys use `AppConfig::default()`.
    let config: AppConfig = settings.try_deserialize()?;
    Ok(config.normalize())
}
