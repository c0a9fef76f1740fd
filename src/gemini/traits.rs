use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The remote generative service. Implementations return the raw response text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Asks for JSON output, optionally constrained by `schema`.
    async fn generate_structured(&self, prompt: &str, schema: Option<&Value>) -> Result<String>;
}
