//! Personalised listing recommendations.

use super::{display, loose_list, loose_text, require};
use crate::{
    coerce,
    errors::PromptError,
    gateway::{generate_structured, ReplyShape},
    prompts::{assistant::RECOMMENDATIONS_PROMPT, render},
    providers::ai::{AiProvider, GenerationRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// Candidates beyond this are not sent, to stay inside the token budget.
pub const MAX_CANDIDATES: usize = 50;
pub const MAX_RECOMMENDATIONS: usize = 5;
const MAX_AMENITIES_PER_LISTING: usize = 5;
const MAX_HISTORY_ITEMS: usize = 5;
const RECOMMENDATION_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub budget: Budget,
    #[serde(default, deserialize_with = "loose_text")]
    pub college: Option<String>,
    #[serde(default, deserialize_with = "loose_list")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub gender: Option<String>,
    #[serde(default, rename = "strictnessTolerance", deserialize_with = "loose_text")]
    pub strictness_tolerance: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserHistory {
    #[serde(default)]
    pub recently_viewed: Vec<Value>,
    #[serde(default)]
    pub saved_pgs: Vec<Value>,
    #[serde(default)]
    pub search_patterns: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub user_preferences: UserPreferences,
    /// Candidate listings, passed through as the frontend sends them.
    #[serde(default)]
    pub available_pgs: Vec<Value>,
    #[serde(default)]
    pub user_history: UserHistory,
}

fn listing_line(pg: &Value) -> String {
    let amenities = coerce::string_list(pg.get("amenities"))
        .into_iter()
        .take(MAX_AMENITIES_PER_LISTING)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "- PG #{}: {} | Rent: ₹{} | Amenities: {} | Location: {} | Rating: {}/5",
        display(pg.get("id"), "N/A"),
        display(pg.get("name"), "Unnamed"),
        display(pg.get("rent"), "0"),
        amenities,
        display(pg.get("address").and_then(|a| a.get("area")), "N/A"),
        display(pg.get("average_rating"), "0"),
    )
}

impl RecommendationRequest {
    pub fn render_prompt(&self) -> String {
        let prefs = &self.user_preferences;
        let listings = self
            .available_pgs
            .iter()
            .take(MAX_CANDIDATES)
            .map(listing_line)
            .collect::<Vec<_>>()
            .join("\n");
        let recently_viewed = self.user_history.recently_viewed.len().min(MAX_HISTORY_ITEMS);
        let saved = self.user_history.saved_pgs.len().min(MAX_HISTORY_ITEMS);

        render(
            RECOMMENDATIONS_PROMPT,
            &[
                ("budget_min", &display(prefs.budget.min.as_ref(), "5000")),
                ("budget_max", &display(prefs.budget.max.as_ref(), "15000")),
                ("college", prefs.college.as_deref().unwrap_or("Not specified")),
                ("amenities", &prefs.amenities.join(", ")),
                ("gender", prefs.gender.as_deref().unwrap_or("any")),
                (
                    "strictness",
                    prefs.strictness_tolerance.as_deref().unwrap_or("moderate"),
                ),
                ("recently_viewed_count", &recently_viewed.to_string()),
                ("saved_count", &saved.to_string()),
                ("listings", &listings),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub pg_id: String,
    pub match_score: i64,
    pub match_reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationList {
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl RecommendationList {
    pub fn empty() -> Self {
        Self {
            recommendations: Vec::new(),
            error: None,
        }
    }
}

impl ReplyShape for RecommendationList {
    const NAME: &'static str = "recommendations";

    fn from_reply(reply: Map<String, Value>) -> Self {
        let mut recommendations: Vec<Recommendation> = match reply.get("recommendations") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| {
                    let pg_id = item
                        .get("pg_id")
                        .and_then(coerce::text)
                        .filter(|id| !id.trim().is_empty())?;
                    Some(Recommendation {
                        pg_id,
                        match_score: coerce::clamped_int(item.get("match_score"), 0, 100)
                            .unwrap_or(0),
                        match_reasons: coerce::string_list(item.get("match_reasons")),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        recommendations.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        recommendations.truncate(MAX_RECOMMENDATIONS);
        Self {
            recommendations,
            error: None,
        }
    }

    fn fallback() -> Self {
        Self {
            recommendations: Vec::new(),
            error: Some("AI response formatting issue. Please try again.".to_string()),
        }
    }
}

/// Ranks candidate listings for a user. No candidates means no provider call.
pub async fn recommend(
    provider: Option<&dyn AiProvider>,
    request: &RecommendationRequest,
) -> Result<RecommendationList, PromptError> {
    if request.available_pgs.is_empty() {
        return Ok(RecommendationList::empty());
    }
    let provider = require(provider)?;
    info!(
        candidates = request.available_pgs.len(),
        "Generating personalized recommendations"
    );

    let generation =
        GenerationRequest::new(request.render_prompt()).max_tokens(RECOMMENDATION_MAX_TOKENS);
    generate_structured(provider, &generation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_caps_candidates_and_amenities() {
        let pgs: Vec<Value> = (0..60)
            .map(|i| {
                json!({
                    "id": format!("pg-{i}"),
                    "name": format!("PG {i}"),
                    "rent": 7000 + i,
                    "amenities": ["WiFi", "AC", "Meals", "Laundry", "Gym", "Pool"],
                    "address": {"area": "Viman Nagar"},
                    "average_rating": 4.5
                })
            })
            .collect();
        let request = RecommendationRequest {
            available_pgs: pgs,
            ..Default::default()
        };
        let prompt = request.render_prompt();
        assert!(prompt.contains("- PG #pg-49: PG 49 | Rent: ₹7049"));
        assert!(!prompt.contains("PG #pg-50:"));
        assert!(prompt.contains("Amenities: WiFi, AC, Meals, Laundry, Gym | Location: Viman Nagar | Rating: 4.5/5"));
        assert!(!prompt.contains("Pool"));
    }

    #[test]
    fn prompt_uses_preference_defaults() {
        let request: RecommendationRequest = serde_json::from_value(json!({
            "available_pgs": [{"id": 7, "name": "Green Nest"}],
            "user_history": {"recently_viewed": [1, 2, 3, 4, 5, 6, 7], "saved_pgs": ["a"]}
        }))
        .unwrap();
        let prompt = request.render_prompt();
        assert!(prompt.contains("- Budget: ₹5000 - ₹15000"));
        assert!(prompt.contains("- College/Workplace: Not specified"));
        assert!(prompt.contains("- Gender Preference: any"));
        assert!(prompt.contains("- Strictness Tolerance: moderate"));
        assert!(prompt.contains("- Recently Viewed: 5 PGs"));
        assert!(prompt.contains("- Saved PGs: 1 PGs"));
        assert!(prompt.contains("- PG #7: Green Nest | Rent: ₹0 | Amenities:  | Location: N/A | Rating: 0/5"));
    }

    #[test]
    fn reply_is_normalized_sorted_and_truncated() {
        let reply = json!({
            "recommendations": [
                {"pg_id": 1, "match_score": 60, "match_reasons": ["Cheap"]},
                {"pg_id": "2", "match_score": "95", "match_reasons": ["Near college"]},
                {"match_score": 99},
                {"pg_id": "3", "match_score": 140},
                {"pg_id": "4", "match_score": 10},
                {"pg_id": "5", "match_score": 20},
                {"pg_id": "6", "match_score": 30}
            ]
        });
        let list = RecommendationList::from_reply(reply.as_object().cloned().unwrap());
        let ids: Vec<&str> = list.recommendations.iter().map(|r| r.pg_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1", "6", "5"]);
        assert_eq!(list.recommendations[0].match_score, 100);
        assert!(list.recommendations[0].match_reasons.is_empty());
        assert!(list.error.is_none());
    }

    #[tokio::test]
    async fn no_candidates_returns_empty_list_without_provider() {
        let list = recommend(None, &RecommendationRequest::default()).await.unwrap();
        assert_eq!(list, RecommendationList::empty());
    }
}
