pub mod extract;
#[cfg(test)]
pub(crate) mod mock;
pub mod prompts;

use crate::{
    error::{DecodeStage, PromptError, Result},
    gemini::GenerativeModel,
    models::{ImagePrompt, ModificationKind},
};
use std::sync::Arc;

pub use extract::{extract_fenced_json, ExtractionStrategy};

/// Turns a theme into a title and a structured image prompt, and rewrites that prompt.
#[derive(Clone)]
pub struct PromptGenerator {
    model: Arc<dyn GenerativeModel>,
    strategy: ExtractionStrategy,
}

impl PromptGenerator {
    pub fn new(model: Arc<dyn GenerativeModel>, strategy: ExtractionStrategy) -> Self {
        Self { model, strategy }
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    pub async fn generate_title(&self, theme: &str) -> Result<String> {
        if theme.trim().is_empty() {
            return Err(PromptError::ValidationError(
                "Please enter a theme before generating".into(),
            ));
        }

        let prompt = prompts::title_prompt(theme);
        log::debug!("Title prompt: {}", prompt);

        let text = self.model.generate_text(&prompt).await?;
        let title = text.trim().to_string();
        log::info!("Generated title: {}", title);
        Ok(title)
    }

    pub async fn generate_prompt(&self, title: &str) -> Result<ImagePrompt> {
        let prompt = prompts::json_prompt(title, self.strategy);
        log::debug!("JSON prompt ({}): {}", self.strategy, prompt);

        let text = self.request_structured(&prompt).await?;
        self.decode(&text, DecodeStage::Generate)
    }

    pub async fn modify_prompt(
        &self,
        current: &ImagePrompt,
        kind: ModificationKind,
    ) -> Result<ImagePrompt> {
        let current_json = current.to_pretty_json()?;
        let prompt = prompts::modify_prompt(&current_json, kind, self.strategy);
        log::debug!("Modify prompt ({}, {}): {}", kind, self.strategy, prompt);

        let text = self.request_structured(&prompt).await?;
        let modified = self.decode(&text, DecodeStage::Modify)?;

        for field in kind.preserved_fields() {
            if field_value(current, field) != field_value(&modified, field) {
                log::warn!("Model changed '{}' during {} modification", field, kind);
            }
        }

        Ok(modified)
    }

    async fn request_structured(&self, prompt: &str) -> Result<String> {
        match self.strategy {
            ExtractionStrategy::SchemaEnforced => {
                let schema = self.strategy.response_schema();
                self.model.generate_structured(prompt, schema.as_ref()).await
            }
            // The fenced block is asked for in the prompt text only.
            ExtractionStrategy::FencedText => self.model.generate_text(prompt).await,
        }
    }

    fn decode(&self, text: &str, stage: DecodeStage) -> Result<ImagePrompt> {
        let value = self.strategy.extract(text).ok_or_else(|| {
            log::debug!("Undecodable response text: {}", text);
            PromptError::DecodeError(stage)
        })?;

        let prompt: ImagePrompt = serde_json::from_value(value).map_err(|e| {
            log::error!("Response JSON does not match the prompt shape: {}", e);
            PromptError::DecodeError(stage)
        })?;

        if let Ok(count) = prompt.char_count() {
            if count.over_limit {
                log::warn!("Prompt is {} characters, over the {} limit", count.count, count.limit);
            }
        }

        Ok(prompt)
    }
}

fn field_value<'a>(prompt: &'a ImagePrompt, field: &str) -> Option<&'a str> {
    match field {
        "concept" => Some(&prompt.concept),
        "composition" => Some(&prompt.composition),
        "color" => Some(&prompt.color),
        "background" => Some(&prompt.background),
        "mood" => Some(&prompt.mood),
        "style" => Some(&prompt.style),
        "settings" => Some(&prompt.settings),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{sample_prompt, MockModel};
    use super::*;
    use crate::models::GenerateContentRequest;

    fn generator(model: &Arc<MockModel>, strategy: ExtractionStrategy) -> PromptGenerator {
        PromptGenerator::new(model.clone(), strategy)
    }

    #[tokio::test]
    async fn title_is_one_request_with_theme_and_trimmed_result() {
        let model = Arc::new(MockModel::new().respond("\n  Fox in snow, winter forest, flat illustration, background art \n"));
        let title = generator(&model, ExtractionStrategy::SchemaEnforced)
            .generate_title("sleeping fox")
            .await
            .unwrap();

        assert_eq!(
            title,
            "Fox in snow, winter forest, flat illustration, background art"
        );
        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("sleeping fox"));
        assert!(!requests[0].json_output);
    }

    #[tokio::test]
    async fn blank_theme_is_rejected_without_a_request() {
        let model = Arc::new(MockModel::new().respond("unused"));
        let gen = generator(&model, ExtractionStrategy::SchemaEnforced);

        for theme in ["", "   ", "\n\t"] {
            let err = gen.generate_title(theme).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn service_errors_propagate_unchanged() {
        let model = Arc::new(MockModel::new().fail(PromptError::ServiceError("quota exceeded".into())));
        let err = generator(&model, ExtractionStrategy::SchemaEnforced)
            .generate_title("fox")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[tokio::test]
    async fn schema_variant_declares_schema_and_parses_body() {
        let body = serde_json::to_string(&sample_prompt()).unwrap();
        let model = Arc::new(MockModel::new().respond(body));
        let prompt = generator(&model, ExtractionStrategy::SchemaEnforced)
            .generate_prompt("Fox in snow")
            .await
            .unwrap();

        assert_eq!(prompt, sample_prompt());
        let request = &model.requests()[0];
        assert!(request.json_output);
        assert_eq!(request.response_schema, Some(ImagePrompt::response_schema()));
        assert!(request.prompt.contains("Fox in snow"));
    }

    #[tokio::test]
    async fn fenced_variant_extracts_block_from_prose() {
        let body = format!(
            "Here you go:\n```json\n{}\n```\nLet me know if you want changes.",
            sample_prompt().to_pretty_json().unwrap()
        );
        let model = Arc::new(MockModel::new().respond(body));
        let prompt = generator(&model, ExtractionStrategy::FencedText)
            .generate_prompt("Fox in snow")
            .await
            .unwrap();

        assert_eq!(prompt, sample_prompt());
        let request = &model.requests()[0];
        assert!(!request.json_output);
        assert!(request.response_schema.is_none());

        let wire = serde_json::to_value(GenerateContentRequest::from(request)).unwrap();
        assert!(wire.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn fenced_modification_is_a_plain_text_request() {
        let body = format!("```json\n{}\n```", sample_prompt().to_pretty_json().unwrap());
        let model = Arc::new(MockModel::new().respond(body));
        generator(&model, ExtractionStrategy::FencedText)
            .modify_prompt(&sample_prompt(), ModificationKind::Style)
            .await
            .unwrap();

        let request = &model.requests()[0];
        assert!(!request.json_output);
        assert!(request.prompt.contains("```json"));
    }

    #[tokio::test]
    async fn unknown_fields_are_dropped_on_decode() {
        let mut value = serde_json::to_value(sample_prompt()).unwrap();
        value["lighting"] = "Golden hour".into();
        let model = Arc::new(MockModel::new().respond(value.to_string()));

        let prompt = generator(&model, ExtractionStrategy::SchemaEnforced)
            .generate_prompt("Fox")
            .await
            .unwrap();

        assert_eq!(prompt, sample_prompt());
        assert!(!prompt.to_pretty_json().unwrap().contains("lighting"));
    }

    #[tokio::test]
    async fn malformed_json_gives_generic_decode_error() {
        for strategy in [ExtractionStrategy::SchemaEnforced, ExtractionStrategy::FencedText] {
            let model = Arc::new(MockModel::new().respond("{\"concept\": \"unterminated"));
            let err = generator(&model, strategy)
                .generate_prompt("Fox")
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Failed to generate a valid JSON prompt");

            let model = Arc::new(MockModel::new().respond("not json at all"));
            let err = generator(&model, strategy)
                .modify_prompt(&sample_prompt(), ModificationKind::Color)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Failed to modify the JSON prompt");
        }
    }

    #[tokio::test]
    async fn missing_field_is_a_decode_error() {
        let model = Arc::new(MockModel::new().respond(r#"{"concept": "fox"}"#));
        let err = generator(&model, ExtractionStrategy::SchemaEnforced)
            .generate_prompt("Fox")
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn color_modification_preserves_untouched_fields() {
        let current = sample_prompt();
        let mut echoed = current.clone();
        echoed.color = "Teal and gold".into();
        echoed.background = "Aurora sky".into();

        let model = Arc::new(MockModel::new().respond(serde_json::to_string(&echoed).unwrap()));
        let modified = generator(&model, ExtractionStrategy::SchemaEnforced)
            .modify_prompt(&current, ModificationKind::Color)
            .await
            .unwrap();

        assert_eq!(modified.concept, current.concept);
        assert_eq!(modified.composition, current.composition);
        assert_eq!(modified.style, current.style);
        assert_eq!(modified.settings, current.settings);
        assert_eq!(modified.color, "Teal and gold");

        let request = &model.requests()[0];
        assert!(request.prompt.contains(&current.to_pretty_json().unwrap()));
    }

    #[tokio::test]
    async fn style_modification_preserves_untouched_fields() {
        let current = sample_prompt();
        let mut echoed = current.clone();
        echoed.style = "Watercolor".into();
        echoed.color = "Soft pastels".into();
        echoed.background = "Washed paper texture".into();
        echoed.mood = "Dreamy".into();

        let body = format!("```json\n{}\n```", serde_json::to_string_pretty(&echoed).unwrap());
        let model = Arc::new(MockModel::new().respond(body));
        let modified = generator(&model, ExtractionStrategy::FencedText)
            .modify_prompt(&current, ModificationKind::Style)
            .await
            .unwrap();

        assert_eq!(modified.concept, current.concept);
        assert_eq!(modified.composition, current.composition);
        assert_eq!(modified.settings, current.settings);
        assert_eq!(modified.style, "Watercolor");
    }
}
