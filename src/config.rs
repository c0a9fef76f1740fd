use crate::{
    error::{PromptError, Result},
    generator::ExtractionStrategy,
};
use std::env;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_KEYWORD_CHECKER_URL: &str = "https://trends.google.com/trends/explore";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        GeminiConfig {
            api_key,
            model,
            base_url,
            timeout_secs,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Returns the key or the fatal startup error telling the operator how to fix it.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            PromptError::ConfigError(
                "GEMINI_API_KEY is not set. Add it to your environment or .env file and restart."
                    .into(),
            )
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub strategy: ExtractionStrategy,
    pub keyword_checker_url: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gemini: GeminiConfig::default(),
            strategy: ExtractionStrategy::default(),
            keyword_checker_url: DEFAULT_KEYWORD_CHECKER_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let strategy = match env::var("EXTRACTION_STRATEGY") {
            Ok(value) => value.parse()?,
            Err(_) => ExtractionStrategy::default(),
        };
        let keyword_checker_url = env::var("KEYWORD_CHECKER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_KEYWORD_CHECKER_URL.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(AppConfig {
            gemini: GeminiConfig::from_env(),
            strategy,
            keyword_checker_url,
            port,
        })
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_keyword_checker_url(mut self, url: impl Into<String>) -> Self {
        self.keyword_checker_url = url.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Startup check. Nothing that talks to the model is built until this passes.
    pub fn validate(&self) -> Result<()> {
        self.gemini.require_api_key()?;

        if self.gemini.model.trim().is_empty() {
            return Err(PromptError::ConfigError("GEMINI_MODEL must not be empty".into()));
        }

        url::Url::parse(&self.keyword_checker_url).map_err(|e| {
            PromptError::ConfigError(format!("KEYWORD_CHECKER_URL is not a valid URL: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_a_config_error() {
        let config = AppConfig::new();
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn builder_sets_fields() {
        let config = AppConfig::new()
            .with_gemini(
                GeminiConfig::new()
                    .with_api_key("test-key")
                    .with_model("gemini-2.0-flash")
                    .with_timeout_secs(5),
            )
            .with_strategy(ExtractionStrategy::FencedText)
            .with_keyword_checker_url("https://checker.test/")
            .with_port(9000);

        assert!(config.validate().is_ok());
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout_secs, 5);
        assert_eq!(config.strategy, ExtractionStrategy::FencedText);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn invalid_checker_url_is_rejected() {
        let config = AppConfig::new()
            .with_gemini(GeminiConfig::new().with_api_key("k"))
            .with_keyword_checker_url("not a url");
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn keyword_checker_has_a_default_base() {
        let config = AppConfig::new().with_gemini(GeminiConfig::new().with_api_key("k"));
        assert_eq!(config.keyword_checker_url, DEFAULT_KEYWORD_CHECKER_URL);
        assert!(config.validate().is_ok());
    }
}
