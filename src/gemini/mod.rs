pub mod text_client;
pub mod traits;

use crate::{
    config::GeminiConfig,
    error::{PromptError, Result},
    models::{ModelInfo, TextGenerationRequest},
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub use text_client::TextClient;
pub use traits::GenerativeModel;

#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
}

impl GeminiClient {
    /// Fails with a configuration error when no API key is present.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PromptError::ConfigError(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            text_client: TextClient::new(http, config.base_url, config.model, api_key),
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        [
            ("gemini-1.5-flash", "Gemini 1.5 Flash", "Fast general model"),
            ("gemini-1.5-pro", "Gemini 1.5 Pro", "Higher quality, slower"),
            ("gemini-2.0-flash", "Gemini 2.0 Flash", "Current generation fast model"),
        ]
        .into_iter()
        .map(|(id, name, description)| ModelInfo {
            id: id.to_string(),
            name: name.to_string(),
            supports_schema: true,
            description: description.to_string(),
        })
        .collect()
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.text_client
            .generate(TextGenerationRequest::text(prompt))
            .await
    }

    async fn generate_structured(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        self.text_client
            .generate(TextGenerationRequest::structured(prompt, schema.cloned()))
            .await
    }
}
