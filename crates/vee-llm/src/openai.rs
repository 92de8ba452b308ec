//! OpenAI-compatible chat completion client.
//!
//! Speaks the `/chat/completions` dialect, so it works against OpenAI
//! itself or any compatible gateway via `base_url`. Vision calls go through
//! the same endpoint with an image content block and the configured vision
//! model.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use vee_core::messages::ChatMessage;

use crate::errors::{LlmError, Result};
use crate::service::ChatClient;
use crate::types::{CompletionRequest, CompletionResponse};

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Model for text chat.
    pub model: String,
    /// Model for image analysis.
    pub vision_model: String,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token. Required; construction fails without one.
    pub api_key: Option<String>,
    /// Per-call time budget in seconds.
    pub timeout_seconds: u64,
}

/// [`ChatClient`] over an OpenAI-compatible HTTP endpoint.
#[derive(Debug)]
pub struct OpenAiClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Build a client from `config`.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
        let timeout = Duration::from_secs(config.timeout_seconds.max(1));
        let client = reqwest::Client::builder()
            .build()
            .map_err(LlmError::Http)?;
        Ok(Self {
            client,
            config,
            api_key,
            timeout,
        })
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String> {
        let body = CompletionRequest {
            model,
            messages,
            temperature,
        };
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let content = parsed
            .first_content()
            .ok_or_else(|| LlmError::InvalidResponse("no completion content".into()))?;

        debug!(model, chars = content.len(), "completion received");
        Ok(content)
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        self.complete(&self.config.model, messages, temperature)
            .await
    }

    async fn analyze_image(&self, image_base64: &str, prompt: &str) -> Result<String> {
        let messages = [ChatMessage::user_with_image(prompt, image_base64)];
        self.complete(&self.config.vision_model, &messages, 0.2)
            .await
    }
}
