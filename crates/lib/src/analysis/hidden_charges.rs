//! # Hidden-Charge Detection
//!
//! Asks the model to rate how transparent a listing is about its costs, then
//! corrects the reply against what the listing actually states. Models tend to
//! report maintenance, electricity or food as "missing" even when the owner
//! filled them in; such entries are removed and the score is raised.

use super::{display, loose_bool, loose_list, loose_text, require};
use crate::{
    coerce,
    errors::PromptError,
    gateway::{generate_structured, ReplyShape},
    prompts::{listing::HIDDEN_CHARGES_PROMPT, render},
    providers::ai::{AiProvider, GenerationRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

const RISK_LEVELS: [&str; 3] = ["low", "medium", "high"];
const DEFAULT_RISK_LEVEL: &str = "medium";
const DEFAULT_TRANSPARENCY_SCORE: i64 = 50;
/// Points added back for every hidden charge dropped as a false positive.
pub const FALSE_POSITIVE_SCORE_BOOST: i64 = 10;
pub const MIN_QUESTIONS: usize = 3;

pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "Are there any additional charges apart from rent and deposit?",
    "What utilities are included in the rent?",
    "Is there a maintenance fee, and what does it cover?",
];

const NOT_SPECIFIED: &str = "Not specified";

/// The financial and amenity fields of a listing, as posted by the frontend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCharges {
    #[serde(default, deserialize_with = "loose_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub rent: Option<Value>,
    #[serde(default)]
    pub deposit: Option<Value>,
    #[serde(default, deserialize_with = "loose_list")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub rules: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub maintenance_charges: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub electricity_charges: Option<String>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub food_included: bool,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ListingCharges {
    /// A maintenance amount of `"0"` is treated as not stated.
    pub fn has_maintenance(&self) -> bool {
        non_blank(&self.maintenance_charges).is_some_and(|v| v != "0")
    }

    pub fn has_electricity(&self) -> bool {
        non_blank(&self.electricity_charges).is_some()
    }

    pub fn has_food(&self) -> bool {
        self.food_included
    }

    /// True when `entry` is about a cost the listing already states.
    pub fn already_states(&self, entry: &str) -> bool {
        let entry = entry.to_lowercase();
        (self.has_maintenance() && entry.contains("maintenance"))
            || (self.has_electricity() && entry.contains("electric"))
            || (self.has_food() && entry.contains("food"))
    }

    pub fn render_prompt(&self) -> String {
        let amenities = if self.amenities.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            self.amenities.join(", ")
        };
        let maintenance = match non_blank(&self.maintenance_charges) {
            Some(amount) if self.has_maintenance() => format!("₹{amount}/month"),
            _ => NOT_SPECIFIED.to_string(),
        };
        let electricity = non_blank(&self.electricity_charges)
            .unwrap_or(NOT_SPECIFIED)
            .to_string();
        let food = if self.has_food() {
            "Yes, food is included"
        } else {
            NOT_SPECIFIED
        };

        render(
            HIDDEN_CHARGES_PROMPT,
            &[
                ("rent", &display(self.rent.as_ref(), "0")),
                ("deposit", &display(self.deposit.as_ref(), "0")),
                ("amenities", &amenities),
                ("maintenance", &maintenance),
                ("electricity", &electricity),
                ("food", food),
                (
                    "description",
                    non_blank(&self.description).unwrap_or("No description provided"),
                ),
                ("rules", non_blank(&self.rules).unwrap_or("No rules specified")),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenCharge {
    pub charge: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenChargeReport {
    pub risk_level: String,
    pub potential_hidden_charges: Vec<HiddenCharge>,
    pub missing_information: Vec<String>,
    pub questions_to_ask: Vec<String>,
    pub transparency_score: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

fn parse_charges(value: Option<&Value>) -> Vec<HiddenCharge> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let charge = item.get("charge").and_then(coerce::text)?;
            let reason = item.get("reason").and_then(coerce::text)?;
            Some(HiddenCharge { charge, reason })
        })
        .collect()
}

impl ReplyShape for HiddenChargeReport {
    const NAME: &'static str = "hidden_charges";

    fn from_reply(reply: Map<String, Value>) -> Self {
        Self {
            risk_level: coerce::one_of(reply.get("risk_level"), &RISK_LEVELS, DEFAULT_RISK_LEVEL),
            potential_hidden_charges: parse_charges(reply.get("potential_hidden_charges")),
            missing_information: coerce::string_list(reply.get("missing_information")),
            questions_to_ask: coerce::string_list(reply.get("questions_to_ask")),
            transparency_score: coerce::clamped_int(reply.get("transparency_score"), 0, 100)
                .unwrap_or(DEFAULT_TRANSPARENCY_SCORE),
            error: None,
        }
    }

    fn fallback() -> Self {
        Self {
            risk_level: DEFAULT_RISK_LEVEL.to_string(),
            potential_hidden_charges: Vec::new(),
            missing_information: vec![
                "Unable to analyze - please verify all charges with owner".to_string(),
            ],
            questions_to_ask: vec![
                "Are there any additional charges apart from rent and deposit?".to_string(),
                "What utilities are included in the rent?".to_string(),
                "Is there a maintenance fee?".to_string(),
            ],
            transparency_score: DEFAULT_TRANSPARENCY_SCORE,
            error: Some("Analysis temporarily unavailable".to_string()),
        }
    }
}

impl HiddenChargeReport {
    /// Removes entries about costs the listing states, adjusts the score and
    /// makes sure there are enough questions to ask.
    pub fn correct_against(mut self, listing: &ListingCharges) -> Self {
        let before = self.potential_hidden_charges.len();
        self.potential_hidden_charges
            .retain(|c| !listing.already_states(&c.charge));
        self.missing_information
            .retain(|item| !listing.already_states(item));

        let removed = (before - self.potential_hidden_charges.len()) as i64;
        if removed > 0 {
            self.transparency_score =
                (self.transparency_score + removed * FALSE_POSITIVE_SCORE_BOOST).min(100);
        }
        self.transparency_score = self.transparency_score.clamp(0, 100);

        for question in DEFAULT_QUESTIONS {
            if self.questions_to_ask.len() >= MIN_QUESTIONS {
                break;
            }
            if !self.questions_to_ask.iter().any(|q| q == question) {
                self.questions_to_ask.push(question.to_string());
            }
        }
        self
    }
}

/// Rates a listing's cost transparency.
pub async fn detect_hidden_charges(
    provider: Option<&dyn AiProvider>,
    listing: &ListingCharges,
) -> Result<HiddenChargeReport, PromptError> {
    let provider = require(provider)?;
    info!(
        maintenance = listing.has_maintenance(),
        electricity = listing.has_electricity(),
        food = listing.has_food(),
        "Running hidden-charge detection"
    );

    let generation = GenerationRequest::new(listing.render_prompt()).temperature(0.0);
    let report: HiddenChargeReport = generate_structured(provider, &generation).await?;
    Ok(report.correct_against(listing))
}
