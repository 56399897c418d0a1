//! Chat-completion client for an Azure-OpenAI-style deployment endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::Config;
use crate::contract::{CompletionError, CompletionRequest, Completions};

pub struct CompletionClient {
    http: Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build HTTP client with custom timeout, using default client");
                Client::new()
            });

        Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            deployment: config.model.clone(),
            api_version: config.api_version.clone(),
            api_key: config.subscription_key.clone(),
        }
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl Completions for CompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: self.deployment.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        debug!(
            model = %body.model,
            messages = body.messages.len(),
            temperature = body.temperature,
            "Sending completion request"
        );

        let response = self
            .http
            .post(self.chat_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => CompletionError::Authentication(text),
                429 => CompletionError::RateLimited(text),
                s if s >= 500 => CompletionError::ServiceUnavailable(text),
                s => CompletionError::InvalidResponse(format!("API error {s}: {text}")),
            });
        }

        let reply: ChatResponse = response.json().await.map_err(|e| {
            CompletionError::InvalidResponse(format!("undecodable completion response: {e}"))
        })?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                CompletionError::InvalidResponse("completion reply carried no content".to_string())
            })
    }
}

// === Wire types ===

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: String,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}
