//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - Hack Club AI (https://ai.hackclub.com/chat/completions, no key needed)
//! - OpenRouter (https://openrouter.ai/api/v1/chat/completions, key required)
//! - vLLM, LocalAI, llama-server (http://localhost:8080/v1/chat/completions)
//!
//! The bearer token, when one is needed, comes from configuration/environment
//! and is never compiled in.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{Error, Result};

use super::AnalysisBackend;

/// Timeout for the reachability probe
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// OpenAI-compatible backend
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f32>,
    referer: Option<String>,
    title: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a backend for `endpoint` with a request timeout
    pub fn new(base_url: &str, completions_path: &str, model: &str, timeout: Duration) -> Result<Self> {
        let config = AiConfig {
            base_url: base_url.to_string(),
            completions_path: completions_path.to_string(),
            model: model.to_string(),
            timeout_secs: timeout.as_secs().max(1),
            ..Default::default()
        };
        Self::from_config(&config)
    }

    /// Create from the `[ai]` config section
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoint: config.endpoint(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    fn build_request(&self, system: &str, user: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
        }
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl AnalysisBackend for OpenAICompatibleBackend {
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let request = self.build_request(system, user);

        let mut req_builder = self.http_client.post(&self.endpoint).json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }
        if let Some(ref referer) = self.referer {
            req_builder = req_builder.header("HTTP-Referer", referer.as_str());
        }
        if let Some(ref title) = self.title {
            req_builder = req_builder.header("X-Title", title.as_str());
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Backend(format!("chat API error {}: {}", status, body)));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;
        if let Some(ref usage) = chat_response.usage {
            debug!(model = %self.model, usage = %usage, "Chat completion token usage");
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Backend("No choices in chat completion response".into()))
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.base_url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .is_ok()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockChatServer, MockChatBehavior};

    #[test]
    fn test_request_shape() {
        let backend = OpenAICompatibleBackend::new(
            "http://localhost:1",
            "/chat/completions",
            "openai/gpt-oss-120b",
            Duration::from_secs(5),
        )
        .unwrap();
        let request = backend.build_request("be terse", "analyze this");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "openai/gpt-oss-120b");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "analyze this");
        assert!(json.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_chat_completion_against_mock_server() {
        let server = MockChatServer::start(MockChatBehavior::Reply("hello from mars".into())).await;
        let config = AiConfig {
            base_url: server.url(),
            model: "test-model".into(),
            api_key: Some("secret".into()),
            ..Default::default()
        };
        let backend = OpenAICompatibleBackend::from_config(&config).unwrap();

        let reply = backend.chat_completion("sys", "user").await.unwrap();
        assert_eq!(reply, "hello from mars");
        assert_eq!(server.hits(), 1);
        assert_eq!(server.last_authorization().as_deref(), Some("Bearer secret"));
    }

    #[tokio::test]
    async fn test_error_status_is_backend_error() {
        let server = MockChatServer::start(MockChatBehavior::Status(503)).await;
        let backend = OpenAICompatibleBackend::new(
            &server.url(),
            "/chat/completions",
            "test-model",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = backend.chat_completion("sys", "user").await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_backend_error() {
        let server = MockChatServer::start(MockChatBehavior::EmptyChoices).await;
        let backend = OpenAICompatibleBackend::new(
            &server.url(),
            "/chat/completions",
            "test-model",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = backend.chat_completion("sys", "user").await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Port 1 is never listening in test environments
        let backend = OpenAICompatibleBackend::new(
            "http://127.0.0.1:1",
            "/chat/completions",
            "test-model",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = backend.chat_completion("sys", "user").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!backend.health_check().await);
    }
}
