//! # AI Analyses
//!
//! Domain logic behind each AI-backed endpoint: request payloads, prompt
//! rendering, reply shapes with their fallbacks, and post-processing.

pub mod chatbot;
pub mod description;
pub mod hidden_charges;
pub mod recommendations;
pub mod sentiment;

use crate::{coerce, errors::PromptError, providers::ai::AiProvider};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Returns the provider or the "not configured" error.
pub(crate) fn require(provider: Option<&dyn AiProvider>) -> Result<&dyn AiProvider, PromptError> {
    provider.ok_or(PromptError::NotConfigured)
}

/// Accepts a string, number or boolean where the frontend is inconsistent.
pub(crate) fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce::text))
}

/// Accepts `true`, `"true"`, `"yes"` or a non-zero number as true.
pub(crate) fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// Accepts a list of scalars; anything else becomes an empty list.
pub(crate) fn loose_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce::string_list(value.as_ref()))
}

/// Renders an optional scalar for a prompt, using `default` when absent.
pub(crate) fn display(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(coerce::text)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
