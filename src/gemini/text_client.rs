use crate::{
    error::{PromptError, Result},
    models::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse, TextGenerationRequest},
};
use reqwest::{header, Client, StatusCode};

#[derive(Clone)]
pub struct TextClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl TextClient {
    pub fn new(client: Client, base_url: String, model: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        let key = header::HeaderValue::from_str(&self.api_key)
            .map_err(|_| PromptError::ConfigError("API key contains invalid characters".into()))?;
        headers.insert("x-goog-api-key", key);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }

    pub async fn generate(&self, request: TextGenerationRequest) -> Result<String> {
        let payload = GenerateContentRequest::from(&request);
        let request_json = serde_json::to_string(&payload)
            .map_err(|e| PromptError::SerializationError(e.to_string()))?;

        log::info!(
            "Invoking model: {} (json output: {})",
            self.model,
            request.json_output
        );
        log::debug!("Generation request payload: {}", request_json);

        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .body(request_json)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini transport error details: {:?}", e);
                PromptError::RequestError(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PromptError::ResponseError(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::service_error(status, &body));
        }

        Self::parse_response_text(&body)
    }

    fn service_error(status: StatusCode, body: &str) -> PromptError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(api_error) => {
                log::error!("Service error code: {} ({})", api_error.error.code, api_error.error.status);
                log::error!("Service error message: {}", api_error.error.message);
                if api_error.error.message.is_empty() {
                    PromptError::ServiceError(format!("Gemini returned {}", status))
                } else {
                    PromptError::ServiceError(api_error.error.message)
                }
            }
            Err(_) => {
                log::error!("Gemini returned {} with body: {}", status, body);
                PromptError::ServiceError(format!("Gemini returned {}: {}", status, body))
            }
        }
    }

    pub(crate) fn parse_response_text(body: &str) -> Result<String> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| PromptError::ResponseError(format!("Unexpected response body: {}", e)))?;

        if let Some(text) = response.text() {
            return Ok(text);
        }

        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .or_else(|| {
                response
                    .candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.clone())
            })
            .unwrap_or_else(|| "no candidates".to_string());

        Err(PromptError::ServiceError(format!(
            "The model returned no text ({})",
            reason
        )))
    }
}
