//! Ollama backend.
//!
//! Calls the non-streaming generate endpoint:
//! `POST {base_url}/api/generate` with `{ model, prompt, stream: false }`
//! and reads the `response` field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ExplainerConfig, ExplanationBackend};
use crate::error::ExplainError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Language-model backend served by Ollama.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Creates a backend from explainer settings.
    pub fn new(config: &ExplainerConfig) -> Result<Self, ExplainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Model name sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl ExplanationBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String, ExplainError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "calling ollama");

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExplainError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ExplainError::MalformedResponse(e.to_string()))?;

        match (parsed.response, parsed.error) {
            (_, Some(error)) => Err(ExplainError::MalformedResponse(error)),
            (Some(text), None) => Ok(text),
            (None, None) => Err(ExplainError::MalformedResponse(
                "missing 'response' field".to_string(),
            )),
        }
    }
}
