//! Pluggable chat-completion backend abstraction
//!
//! The analyzer only needs one operation from a model: send a system
//! instruction plus a user prompt and get the reply text back. Backends hide
//! transport details behind that.
//!
//! # Architecture
//!
//! - `AnalysisBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//! - `parsing`: turns a reply into a `RecyclingResult`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AppConfig::load(None)?;
//! if let Some(client) = AIClient::from_config(&config.ai)? {
//!     let reply = client.chat_completion(system, user).await?;
//!     let result = parse_model_reply(&reply)?;
//! }
//! ```

mod mock;
mod openai_compatible;
pub mod parsing;

pub use mock::{MockBackend, MockReply};
pub use openai_compatible::OpenAICompatibleBackend;
pub use parsing::{parse_model_reply, ParseError};

use async_trait::async_trait;

use crate::config::AiConfig;
use crate::error::Result;

/// Trait defining the interface for all chat-completion backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Send a system instruction and user prompt, return the reply text
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Any server implementing the OpenAI chat completions API
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from configuration
    ///
    /// Returns `Ok(None)` when the backend is `none`, meaning every analysis
    /// goes straight to the fallback generator.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>> {
        match config.backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" => Ok(Some(AIClient::OpenAICompatible(
                OpenAICompatibleBackend::from_config(config)?,
            ))),
            "mock" => Ok(Some(AIClient::Mock(MockBackend::new()))),
            "none" => Ok(None),
            other => {
                tracing::warn!(backend = %other, "Unknown AI backend, AI disabled");
                Ok(None)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AnalysisBackend for AIClient {
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.chat_completion(system, user).await,
            AIClient::Mock(b) => b.chat_completion(system, user).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
