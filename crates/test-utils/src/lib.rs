use smartstay::errors::PromptError;
use smartstay::providers::ai::{AiProvider, GenerationRequest};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// A scripted stand-in for a text-generation provider.
///
/// Replies are matched by a substring of the rendered prompt; the first
/// matching key wins. Every request is recorded for later assertions.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, Scripted)>>>,
    fallback: Arc<Mutex<Option<Scripted>>>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            fallback: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that answers every prompt with `reply`.
    pub fn replying(reply: &str) -> Self {
        let mock = Self::new();
        *mock.fallback.lock().unwrap() = Some(Scripted::Reply(reply.to_string()));
        mock
    }

    /// A provider whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        let mock = Self::new();
        *mock.fallback.lock().unwrap() = Some(Scripted::Fail(message.to_string()));
        mock
    }

    /// Pre-programs a response for prompts containing `key`.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), Scripted::Reply(response.to_string())));
    }

    /// Pre-programs a provider failure for prompts containing `key`.
    pub fn add_failure(&self, key: &str, message: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), Scripted::Fail(message.to_string())));
    }

    /// Retrieves the recorded requests for assertion.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, PromptError> {
        self.calls.lock().unwrap().push(request.clone());

        let scripted = {
            let responses = self.responses.lock().unwrap();
            responses
                .iter()
                .find(|(key, _)| request.prompt.contains(key.as_str()))
                .map(|(_, scripted)| scripted.clone())
        }
        .or_else(|| self.fallback.lock().unwrap().clone());

        match scripted {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(message)) => Err(PromptError::AiApi(message)),
            None => Err(PromptError::AiApi(format!(
                "MockAiProvider: No response programmed for prompt. Got: '{}'",
                request.prompt
            ))),
        }
    }
}
