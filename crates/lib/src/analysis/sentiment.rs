//! Review sentiment summaries.

use super::{loose_text, require};
use crate::{
    coerce,
    errors::PromptError,
    gateway::{generate_structured, ReplyShape},
    prompts::{listing::SENTIMENT_ANALYSIS_PROMPT, render},
    providers::ai::{AiProvider, GenerationRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

const SENTIMENTS: [&str; 3] = ["positive", "negative", "neutral"];
const MAX_KEYWORDS: usize = 3;

/// A single review. The frontend has used several field names for the text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "loose_text")]
    pub review_text: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub comment: Option<String>,
}

impl Review {
    pub fn body(&self) -> &str {
        self.review_text
            .as_deref()
            .or(self.text.as_deref())
            .or(self.comment.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, deserialize_with = "loose_text")]
    pub pg_name: Option<String>,
}

impl SentimentRequest {
    pub fn render_prompt(&self) -> String {
        let reviews = self
            .reviews
            .iter()
            .map(|review| format!("- {}", review.body()))
            .collect::<Vec<_>>()
            .join("\n");
        let pg_name = self.pg_name.as_deref().unwrap_or("this property");
        render(
            SENTIMENT_ANALYSIS_PROMPT,
            &[("pg_name", pg_name), ("reviews", &reviews)],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentKeywords {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub overall_sentiment: String,
    pub positive_count: u32,
    pub negative_count: u32,
    pub neutral_count: u32,
    pub insights: String,
    pub keywords: SentimentKeywords,
}

impl SentimentSummary {
    fn neutral(insights: &str) -> Self {
        Self {
            overall_sentiment: "neutral".to_string(),
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            insights: insights.to_string(),
            keywords: SentimentKeywords::default(),
        }
    }

    /// The summary for a listing that has no reviews yet.
    pub fn no_reviews() -> Self {
        Self::neutral("No reviews available yet.")
    }
}

fn count(reply: &Map<String, Value>, key: &str) -> u32 {
    coerce::clamped_int(reply.get(key), 0, u32::MAX as i64).unwrap_or(0) as u32
}

fn keywords(value: Option<&Value>, key: &str) -> Vec<String> {
    let mut words = coerce::string_list(value.and_then(|v| v.get(key)));
    words.truncate(MAX_KEYWORDS);
    words
}

impl ReplyShape for SentimentSummary {
    const NAME: &'static str = "sentiment";

    fn from_reply(reply: Map<String, Value>) -> Self {
        let keyword_block = reply.get("keywords");
        Self {
            overall_sentiment: coerce::one_of(reply.get("overall_sentiment"), &SENTIMENTS, "neutral"),
            positive_count: count(&reply, "positive_count"),
            negative_count: count(&reply, "negative_count"),
            neutral_count: count(&reply, "neutral_count"),
            insights: reply.get("insights").and_then(coerce::text).unwrap_or_default(),
            keywords: SentimentKeywords {
                positive: keywords(keyword_block, "positive"),
                negative: keywords(keyword_block, "negative"),
            },
        }
    }

    fn fallback() -> Self {
        Self::neutral("Sentiment analysis is temporarily unavailable. Please try again later.")
    }
}

/// Summarises review sentiment. Listings without reviews never reach the provider.
pub async fn analyze_sentiment(
    provider: Option<&dyn AiProvider>,
    request: &SentimentRequest,
) -> Result<SentimentSummary, PromptError> {
    if request.reviews.is_empty() {
        return Ok(SentimentSummary::no_reviews());
    }
    let provider = require(provider)?;
    info!("Received {} reviews for sentiment analysis", request.reviews.len());

    let generation = GenerationRequest::new(request.render_prompt());
    generate_structured(provider, &generation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn review_body_prefers_review_text_then_text_then_comment() {
        let request: SentimentRequest = serde_json::from_value(json!({
            "pg_name": "Sunrise PG",
            "reviews": [
                {"review_text": "Clean rooms", "text": "ignored"},
                {"text": "Noisy at night"},
                {"comment": "Good food"},
                {"rating": 4}
            ]
        }))
        .unwrap();
        let prompt = request.render_prompt();
        assert!(prompt.contains("Analyze the following reviews for Sunrise PG"));
        assert!(prompt.contains("- Clean rooms\n- Noisy at night\n- Good food\n- "));
        assert!(!prompt.contains("ignored"));
    }

    #[test]
    fn missing_pg_name_reads_naturally() {
        let request: SentimentRequest =
            serde_json::from_value(json!({"reviews": [{"text": "ok"}]})).unwrap();
        assert!(request.render_prompt().contains("reviews for this property"));
    }

    #[test]
    fn from_reply_coerces_each_field() {
        let summary = SentimentSummary::from_reply(object(json!({
            "overall_sentiment": "Positive",
            "positive_count": "4",
            "negative_count": -2,
            "insights": "Guests love the food.",
            "keywords": {"positive": ["food", "clean", "safe", "quiet"], "negative": "none"}
        })));
        assert_eq!(summary.overall_sentiment, "positive");
        assert_eq!(summary.positive_count, 4);
        assert_eq!(summary.negative_count, 0);
        assert_eq!(summary.neutral_count, 0);
        assert_eq!(summary.keywords.positive, vec!["food", "clean", "safe"]);
        assert!(summary.keywords.negative.is_empty());
    }

    #[test]
    fn unknown_sentiment_becomes_neutral() {
        let summary = SentimentSummary::from_reply(object(json!({"overall_sentiment": "mixed"})));
        assert_eq!(summary.overall_sentiment, "neutral");
        assert_eq!(summary.insights, "");
    }

    #[tokio::test]
    async fn empty_reviews_skip_the_provider() {
        let summary = analyze_sentiment(None, &SentimentRequest::default())
            .await
            .unwrap();
        assert_eq!(summary, SentimentSummary::no_reviews());
        assert_eq!(summary.positive_count + summary.negative_count + summary.neutral_count, 0);
    }

    #[tokio::test]
    async fn reviews_without_provider_are_not_configured() {
        let request = SentimentRequest {
            reviews: vec![Review::default()],
            pg_name: None,
        };
        let err = analyze_sentiment(None, &request).await.unwrap_err();
        assert!(matches!(err, PromptError::NotConfigured));
    }

    #[test]
    fn pg_name_cannot_pull_reviews_in_twice() {
        let request = SentimentRequest {
            reviews: vec![Review {
                review_text: Some("SECRET_REVIEW".into()),
                ..Default::default()
            }],
            pg_name: Some("{reviews}".into()),
        };
        let prompt = request.render_prompt();
        assert_eq!(prompt.matches("SECRET_REVIEW").count(), 1);
        assert!(prompt.contains("{reviews}"));
    }
}
