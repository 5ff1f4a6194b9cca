//! Client for OpenAI-compatible `/chat/completions` endpoints.

use super::LlmClient;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::json;
use solstake_lib::env;
use tracing::{debug, error, info, instrument};

pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(env::timeouts::http_request())
            .build()
            .context("Failed to build LLM HTTP client")?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Client configured from `LLM_API_URL`, `LLM_API_KEY` and `LLM_MODEL`.
    /// `None` when no API key is set.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(api_key) = env::llm::api_key() else {
            return Ok(None);
        };
        Self::new(env::llm::api_url(), api_key, env::llm::model()).map(Some)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    #[instrument(skip(self, system, prompt), fields(model = %self.model))]
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        debug!("Prompt: {}", prompt);

        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.1,
            "max_tokens": 300
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to LLM API: {}", e);
                anyhow!("LLM request failed: {e}")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("LLM API returned error: {status} - {error_text}"));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        let message = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| anyhow!("Invalid response format from LLM API"))?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .filter(|c| !c.trim().is_empty())
            .or_else(|| message.get("reasoning_content").and_then(|c| c.as_str()))
            .unwrap_or_default();

        if content.trim().is_empty() {
            error!("LLM returned empty response");
            return Err(anyhow!("LLM returned empty response"));
        }

        info!(chars = content.len(), "Received LLM completion");
        Ok(content.to_string())
    }
}
