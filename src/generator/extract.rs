use crate::error::PromptError;
use crate::models::ImagePrompt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)```").expect("fenced json pattern is valid")
});

/// How a JSON object is obtained from the model's response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// The request declares a response schema; the body is parsed as-is.
    #[default]
    SchemaEnforced,
    /// The model is told to answer in a ```json fence, which is cut out of free text.
    FencedText,
}

impl ExtractionStrategy {
    /// Schema sent with structured requests, if this strategy declares one.
    pub fn response_schema(&self) -> Option<Value> {
        match self {
            ExtractionStrategy::SchemaEnforced => Some(ImagePrompt::response_schema()),
            ExtractionStrategy::FencedText => None,
        }
    }

    /// Pulls a JSON value out of `text`. Parse failures are logged and yield `None`.
    pub fn extract(&self, text: &str) -> Option<Value> {
        match self {
            ExtractionStrategy::SchemaEnforced => match serde_json::from_str(text.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::error!("Schema-enforced response is not valid JSON: {}", e);
                    None
                }
            },
            ExtractionStrategy::FencedText => extract_fenced_json(text),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::SchemaEnforced => f.write_str("schema"),
            ExtractionStrategy::FencedText => f.write_str("fenced"),
        }
    }
}

impl FromStr for ExtractionStrategy {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "schema" | "schema_enforced" => Ok(ExtractionStrategy::SchemaEnforced),
            "fenced" | "fenced_text" | "text" => Ok(ExtractionStrategy::FencedText),
            other => Err(PromptError::ConfigError(format!(
                "EXTRACTION_STRATEGY must be 'schema' or 'fenced', got '{}'",
                other
            ))),
        }
    }
}

/// Parses the first ```json fenced block, or the whole text when there is no fence.
pub fn extract_fenced_json(text: &str) -> Option<Value> {
    let candidate = match FENCED_JSON.captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => text,
    };

    match serde_json::from_str(candidate.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Could not parse JSON from model response: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_block_inside_prose_is_extracted() {
        let text = "Here is your prompt:\n```json\n{\"a\":1}\n```\nEnjoy!";
        assert_eq!(extract_fenced_json(text), Some(json!({"a": 1})));
    }

    #[test]
    fn unfenced_json_parses_when_it_is_the_whole_text() {
        assert_eq!(extract_fenced_json("  {\"a\":1}\n"), Some(json!({"a": 1})));
    }

    #[test]
    fn unfenced_json_inside_prose_is_rejected() {
        assert_eq!(extract_fenced_json("Sure! {\"a\":1} Hope it helps."), None);
    }

    #[test]
    fn broken_fenced_block_does_not_fall_back() {
        let text = "```json\n{\"a\":\n```";
        assert_eq!(extract_fenced_json(text), None);
    }

    #[test]
    fn first_fenced_block_wins() {
        let text = "```json\n{\"a\":1}\n```\n```json\n{\"b\":2}\n```";
        assert_eq!(extract_fenced_json(text), Some(json!({"a": 1})));
    }

    #[test]
    fn schema_strategy_parses_body_directly() {
        let strategy = ExtractionStrategy::SchemaEnforced;
        assert_eq!(strategy.extract("{\"a\":1}"), Some(json!({"a": 1})));
        assert_eq!(strategy.extract("```json\n{\"a\":1}\n```"), None);
        assert!(strategy.response_schema().is_some());
        assert!(ExtractionStrategy::FencedText.response_schema().is_none());
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!(
            "fenced".parse::<ExtractionStrategy>().unwrap(),
            ExtractionStrategy::FencedText
        );
        assert_eq!(
            "SCHEMA".parse::<ExtractionStrategy>().unwrap(),
            ExtractionStrategy::SchemaEnforced
        );
        assert!("xml".parse::<ExtractionStrategy>().unwrap_err().is_config());
    }
}
