//! Mock backend for testing
//!
//! Returns a configurable reply and counts how many completions were
//! requested, so tests can assert that cache hits never reach the model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AnalysisBackend;

/// A well-formed reply in the shape the analysis prompt asks for
pub const CANNED_REPLY: &str = r#"```json
{
  "outputs": [
    {"productType": "Recycled Polymer Filament", "quantity": 6.5, "unit": "kg", "suggestedUses": ["Tool handles", "Spare clips", "Storage bins"]},
    {"productType": "Habitat Panels", "quantity": 2, "unit": "units", "suggestedUses": ["Partition walls", "Radiation shielding"]}
  ],
  "resourceUsage": {"energy": 18.4, "water": 3.1, "processingTime": 4.2},
  "benefits": ["Reduces waste mass", "Feeds the habitat fabricator", "Cuts resupply demand", "Keeps water use low"],
  "drawbacks": ["Solar power draw during dust season", "Residual ash needs storage", "Operator time for sorting"],
  "efficiency": 86,
  "sustainability": 92
}
```"#;

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `CANNED_REPLY`
    Valid,
    /// Arbitrary reply text (for parse failure tests)
    Text(String),
    /// Fail as a transport error would
    Error(String),
    /// Sleep before answering with `CANNED_REPLY` (for timeout tests)
    Delayed(Duration),
}

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: MockReply,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, valid replies)
    pub fn new() -> Self {
        Self::with_reply(MockReply::Valid)
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            healthy: true,
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::with_reply(MockReply::Error("backend offline".into()))
        }
    }

    /// Number of completions requested so far (shared across clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn chat_completion(&self, _system: &str, _user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            MockReply::Valid => Ok(CANNED_REPLY.to_string()),
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Error(msg) => Err(Error::Backend(msg.clone())),
            MockReply::Delayed(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(CANNED_REPLY.to_string())
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
