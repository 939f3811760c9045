//! Customer-support chatbot.

use super::{loose_text, require};
use crate::{
    coerce,
    errors::PromptError,
    gateway::{generate_structured, ReplyShape},
    prompts::{assistant::CHATBOT_PROMPT, render},
    providers::ai::{AiProvider, GenerationRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Only the most recent turns are replayed to the model.
pub const HISTORY_WINDOW: usize = 5;

const FALLBACK_RESPONSE: &str = "I'm here to help! You can ask me about finding PGs, understanding features, or using the platform.";
const FALLBACK_ACTIONS: [&str; 2] = ["Search PGs", "View Dashboard"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatTurn {
    #[serde(default, deserialize_with = "loose_text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatContext {
    #[serde(default, deserialize_with = "loose_text")]
    pub current_page: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub user_role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "loose_text")]
    pub message: Option<String>,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
    #[serde(default)]
    pub context: ChatContext,
}

impl ChatRequest {
    /// The user's message, or `None` when it is missing or blank.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }

    pub fn render_prompt(&self) -> String {
        let skip = self.chat_history.len().saturating_sub(HISTORY_WINDOW);
        let history = self
            .chat_history
            .iter()
            .skip(skip)
            .map(|turn| {
                let speaker = if turn.role.as_deref() == Some("user") {
                    "User"
                } else {
                    "Bot"
                };
                format!("{speaker}: {}", turn.content.as_deref().unwrap_or_default())
            })
            .collect::<Vec<_>>()
            .join("\n");
        let history = if history.is_empty() {
            "No previous messages".to_string()
        } else {
            history
        };

        render(
            CHATBOT_PROMPT,
            &[
                (
                    "current_page",
                    self.context.current_page.as_deref().unwrap_or("unknown"),
                ),
                ("user_role", self.context.user_role.as_deref().unwrap_or("guest")),
                ("history", &history),
                ("message", self.message().unwrap_or_default()),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub suggested_actions: Vec<String>,
}

impl ReplyShape for ChatReply {
    const NAME: &'static str = "chatbot";

    fn from_reply(reply: Map<String, Value>) -> Self {
        let Some(response) = reply
            .get("response")
            .and_then(coerce::text)
            .filter(|r| !r.trim().is_empty())
        else {
            return Self::fallback();
        };
        Self {
            response,
            suggested_actions: coerce::string_list(reply.get("suggested_actions")),
        }
    }

    fn fallback() -> Self {
        Self {
            response: FALLBACK_RESPONSE.to_string(),
            suggested_actions: FALLBACK_ACTIONS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Answers a support question in the context of the current page.
pub async fn chat(
    provider: Option<&dyn AiProvider>,
    request: &ChatRequest,
) -> Result<ChatReply, PromptError> {
    let provider = require(provider)?;
    let generation = GenerationRequest::new(request.render_prompt());
    generate_structured(provider, &generation).await
}
