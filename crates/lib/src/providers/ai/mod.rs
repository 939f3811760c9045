pub mod gemini;
pub mod groq;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Token budget used when a caller does not ask for a specific one.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Sampling temperature used for open-ended generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A single prompt sent to a text-generation provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A trait for interacting with a text-generation provider.
///
/// Implementations send the rendered prompt with the requested token budget and
/// temperature, and return the raw reply text. Reshaping the reply is left to
/// the [`gateway`](crate::gateway).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// A short, human-readable provider name used in health output and logs.
    fn name(&self) -> &str;

    /// Generates a reply for the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
