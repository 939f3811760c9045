//! # Prompt-Response Gateway
//!
//! Sends a rendered prompt to the configured provider and turns the free-text
//! reply into one of the fixed output shapes. Provider failures propagate to
//! the caller; a reply that is empty or carries no parsable JSON object is
//! replaced by the shape's fallback so the HTTP call still succeeds.

use crate::{
    errors::PromptError,
    extract::{extract_json_object, strip_code_fence},
    providers::ai::{AiProvider, GenerationRequest},
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// An output shape the gateway can produce from a model reply.
pub trait ReplyShape: Serialize + Sized {
    /// Name used in logs.
    const NAME: &'static str;

    /// Builds the shape from a parsed reply, coercing each field and
    /// substituting defaults for missing or invalid ones.
    fn from_reply(reply: Map<String, Value>) -> Self;

    /// The safe default returned when the reply cannot be used.
    fn fallback() -> Self;
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Runs `request` and reshapes the reply into `S`.
pub async fn generate_structured<S: ReplyShape>(
    provider: &dyn AiProvider,
    request: &GenerationRequest,
) -> Result<S, PromptError> {
    let reply = provider.generate(request).await?;
    debug!(shape = S::NAME, "Raw AI reply: {}", preview(&reply));

    if reply.trim().is_empty() {
        warn!(shape = S::NAME, "AI returned an empty reply. Using fallback.");
        return Ok(S::fallback());
    }

    match extract_json_object(&reply) {
        Some(object) => Ok(S::from_reply(object)),
        None => {
            warn!(
                shape = S::NAME,
                "Could not extract JSON from AI reply. Using fallback. Reply was: '{}'",
                preview(&reply)
            );
            Ok(S::fallback())
        }
    }
}

/// Runs `request` and returns the trimmed reply text, or `None` when the
/// provider answered with nothing.
pub async fn generate_text(
    provider: &dyn AiProvider,
    request: &GenerationRequest,
) -> Result<Option<String>, PromptError> {
    let reply = provider.generate(request).await?;
    let text = strip_code_fence(&reply);
    if text.is_empty() {
        warn!("AI returned an empty reply.");
        return Ok(None);
    }
    Ok(Some(text.to_string()))
}
