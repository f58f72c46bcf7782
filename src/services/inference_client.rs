use crate::error::EngineError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Remote text generation: prompt in, raw generated text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, EngineError>;
}

/// Sampling settings favouring variety over determinism.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub return_full_text: bool,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub do_sample: bool,
    pub repetition_penalty: f32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            return_full_text: false,
            temperature: 0.9,
            top_p: 0.95,
            top_k: 50,
            do_sample: true,
            repetition_penalty: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
    use_cache: bool,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParameters,
    options: InferenceOptions,
}

/// Client for a Hugging Face style text-generation endpoint
/// (`POST {base_url}/{model_id}`).
#[derive(Clone)]
pub struct HfInferenceClient {
    client: Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
    parameters: GenerationParameters,
}

impl HfInferenceClient {
    pub fn new(
        client: Client,
        api_key: String,
        base_url: &str,
        model_id: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_key,
            endpoint: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                model_id.trim_start_matches('/')
            ),
            timeout,
            parameters: GenerationParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for HfInferenceClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, EngineError> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: &self.parameters,
            options: InferenceOptions {
                wait_for_model: true,
                use_cache: false,
            },
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            let text = res.text().await.unwrap_or_default();
            tracing::debug!(body = %text, "Inference model is still loading");
            return Err(EngineError::ModelWarming);
        }
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(EngineError::RemoteUnavailable(format!(
                "status {}: {}",
                status.as_u16(),
                text
            )));
        }

        let body: JsonValue = res.json().await.map_err(transport_error)?;
        extract_generated_text(&body).ok_or_else(|| {
            EngineError::MalformedResponse("response has no generated_text".to_string())
        })
    }
}

fn transport_error(err: reqwest::Error) -> EngineError {
    if err.is_timeout() {
        EngineError::RemoteUnavailable(format!("request timed out: {}", err))
    } else if err.is_decode() {
        EngineError::MalformedResponse(err.to_string())
    } else {
        EngineError::RemoteUnavailable(err.to_string())
    }
}

/// Accepts `[{"generated_text": ..}]` or `{"generated_text": ..}`.
pub fn extract_generated_text(body: &JsonValue) -> Option<String> {
    let entry = match body {
        JsonValue::Array(items) => items.first()?,
        other => other,
    };
    entry
        .get("generated_text")
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
}
