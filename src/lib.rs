//! Theme-to-image-prompt generation on top of Google Gemini.
//!
//! A short theme becomes a stock-style title, the title becomes a seven-field
//! [`ImagePrompt`], and the prompt can be rewritten for colour or style.
//! [`PromptGenerator`] does the model calls; [`InteractionController`]
//! sequences them for a front-end.

pub mod config;
pub mod controller;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod keyword;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;

pub use config::{AppConfig, GeminiConfig};
pub use controller::{CopyTarget, InteractionController, InteractionState, Snapshot};
pub use error::{DecodeStage, PromptError, Result};
pub use gemini::{GeminiClient, GenerativeModel};
pub use generator::{ExtractionStrategy, PromptGenerator};
pub use keyword::KeywordChecker;
pub use models::{CharCount, ImagePrompt, ModificationKind, PROMPT_CHAR_LIMIT};

use std::sync::Arc;

/// Validates `config` and wires the Gemini client, generator and controller together.
pub fn build_controller(config: &AppConfig) -> Result<InteractionController> {
    config.validate()?;

    let client = GeminiClient::new(config.gemini.clone())?;
    let generator = PromptGenerator::new(Arc::new(client), config.strategy);
    let checker = KeywordChecker::new(&config.keyword_checker_url)?;

    Ok(InteractionController::new(generator).with_keyword_checker(checker))
}
