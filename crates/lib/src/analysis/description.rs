//! Listing description generation.

use super::{display, loose_list, loose_text, require};
use crate::{
    errors::PromptError,
    gateway::generate_text,
    prompts::{listing::DESCRIPTION_PROMPT, render},
    providers::ai::{AiProvider, GenerationRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default, deserialize_with = "loose_list")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub location: Option<String>,
    #[serde(default)]
    pub rent: Option<Value>,
    #[serde(default, deserialize_with = "loose_text")]
    pub room_type: Option<String>,
}

impl DescriptionRequest {
    fn room_type(&self) -> &str {
        self.room_type
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or("Shared")
    }

    pub fn render_prompt(&self) -> String {
        render(
            DESCRIPTION_PROMPT,
            &[
                ("location", self.location.as_deref().unwrap_or_default()),
                ("rent", &display(self.rent.as_ref(), "0")),
                ("room_type", self.room_type()),
                ("amenities", &self.amenities.join(", ")),
            ],
        )
    }

    /// A plain description assembled from the attributes alone.
    pub fn fallback_description(&self) -> String {
        let mut text = format!("{} room", self.room_type());
        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            text.push_str(&format!(" in {location}"));
        }
        text.push_str(&format!(
            " available at ₹{} per month.",
            display(self.rent.as_ref(), "0")
        ));
        if !self.amenities.is_empty() {
            text.push_str(&format!(" Amenities include {}.", self.amenities.join(", ")));
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDescription {
    pub description: String,
}

/// Writes a short marketing description for a listing.
pub async fn generate_description(
    provider: Option<&dyn AiProvider>,
    request: &DescriptionRequest,
) -> Result<GeneratedDescription, PromptError> {
    let provider = require(provider)?;
    let generation = GenerationRequest::new(request.render_prompt());
    let description = match generate_text(provider, &generation).await? {
        Some(text) => text,
        None => {
            warn!("Description generation returned nothing. Using attribute summary.");
            request.fallback_description()
        }
    };
    Ok(GeneratedDescription { description })
}
