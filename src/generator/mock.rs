use crate::{
    error::{PromptError, Result},
    gemini::GenerativeModel,
    models::{ImagePrompt, TextGenerationRequest},
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted stand-in for the remote model. Records every request it receives.
#[derive(Default)]
pub struct MockModel {
    responses: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<TextGenerationRequest>>,
    delay: Option<Duration>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, error: PromptError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Every response waits this long before it is returned.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<TextGenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn next(&self, request: TextGenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PromptError::ServiceError("no scripted response".into())))
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.next(TextGenerationRequest::text(prompt)).await
    }

    async fn generate_structured(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        self.next(TextGenerationRequest::structured(prompt, schema.cloned())).await
    }
}

pub fn sample_prompt() -> ImagePrompt {
    ImagePrompt {
        concept: "A red fox curled up asleep in fresh snow".into(),
        composition: "Centered subject, top-down view, generous negative space".into(),
        color: "Rust orange, cool white, pale blue shadows".into(),
        background: "Untouched snowfield with faint tracks".into(),
        mood: "Quiet and peaceful winter morning".into(),
        style: "Flat vector illustration".into(),
        settings: "Aspect ratio 16:9, high detail, clean edges".into(),
    }
}
