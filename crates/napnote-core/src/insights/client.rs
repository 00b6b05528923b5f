//! Completion service client.
//!
//! [`CompletionClient`] is the seam between the insights service and a
//! hosted language model. [`AnthropicClient`] talks to the Messages API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::InsightsError;
use crate::storage::InsightsConfig;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Value shipped in example env files; treated as unset.
const PLACEHOLDER_API_KEY: &str = "your-anthropic-api-key";

/// A text-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Unique identifier (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Send one user prompt and return the text of the reply.
    async fn complete(&self, prompt: &str) -> Result<String, InsightsError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            max_tokens,
        }
    }

    /// Build a client from config, reading the key from `config.api_key_env`.
    ///
    /// # Errors
    /// Returns [`InsightsError::MissingApiKey`] if the variable is unset,
    /// empty, or still holds the placeholder value.
    pub fn from_config(config: &InsightsConfig) -> Result<Self, InsightsError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty() && key != PLACEHOLDER_API_KEY)
            .ok_or_else(|| InsightsError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;

        Ok(Self::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            config.max_tokens,
        ))
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String, InsightsError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, "sending completion request");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "completion API returned an error");
            return Err(InsightsError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .into_iter()
            .next()
            .filter(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(InsightsError::EmptyResponse)?;

        debug!(chars = text.len(), "received completion");
        Ok(text)
    }
}
