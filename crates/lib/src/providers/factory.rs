//! # AI Provider Factory
//!
//! Turns the provider settings loaded by the server into a concrete
//! [`AiProvider`]. A provider whose API key is absent is reported as
//! unconfigured (`Ok(None)`) rather than as an error, so the server can still
//! start and answer health checks.

use crate::{
    errors::PromptError,
    providers::ai::{
        gemini::{gemini_api_url, GeminiProvider, DEFAULT_GEMINI_MODEL},
        groq::{GroqProvider, DEFAULT_GROQ_API_URL, DEFAULT_GROQ_MODEL},
        AiProvider,
    },
};
use tracing::{info, warn};

/// Everything needed to instantiate a text-generation provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// `groq` or `gemini`.
    pub provider: String,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

/// Creates the provider described by `settings`.
///
/// Returns `Ok(None)` when the API key is missing or blank, and an error for an
/// unknown provider type.
pub fn create_provider(
    settings: &ProviderSettings,
) -> Result<Option<Box<dyn AiProvider>>, PromptError> {
    let Some(api_key) = settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
    else {
        warn!(
            "No API key configured for AI provider '{}'. AI endpoints will be unavailable.",
            settings.provider
        );
        return Ok(None);
    };

    let provider: Box<dyn AiProvider> = match settings.provider.as_str() {
        "groq" => {
            let model = settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());
            let api_url = settings
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GROQ_API_URL.to_string());
            info!("Configuring Groq provider with model '{}'", model);
            Box::new(GroqProvider::new(api_url, api_key.to_string(), model)?)
        }
        "gemini" => {
            let model = settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
            let api_url = settings
                .api_url
                .clone()
                .unwrap_or_else(|| gemini_api_url(&model));
            info!("Configuring Gemini provider with URL: {}", api_url);
            Box::new(GeminiProvider::new(api_url, api_key.to_string())?)
        }
        other => {
            return Err(PromptError::AiApi(format!(
                "Unsupported AI provider type '{other}'"
            )));
        }
    };

    Ok(Some(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_means_unconfigured() {
        let settings = ProviderSettings {
            provider: "groq".into(),
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(create_provider(&settings).unwrap().is_none());
    }

    #[test]
    fn builds_each_known_provider() {
        for kind in ["groq", "gemini"] {
            let settings = ProviderSettings {
                provider: kind.into(),
                api_key: Some("secret".into()),
                ..Default::default()
            };
            let provider = create_provider(&settings).unwrap().expect("provider");
            assert_eq!(provider.name(), kind);
        }
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let settings = ProviderSettings {
            provider: "mystery".into(),
            api_key: Some("secret".into()),
            ..Default::default()
        };
        assert!(create_provider(&settings).is_err());
    }
}
