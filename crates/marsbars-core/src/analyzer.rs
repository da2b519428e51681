//! Waste analysis flow
//!
//! Validate, consult the session cache, ask the model, parse, and fall back
//! to the deterministic generator when the model cannot be used. Model
//! failures never surface as errors; the returned `Analysis` records which
//! path produced the result.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ai::{parse_model_reply, AIClient, AnalysisBackend};
use crate::cache::{CacheKey, ResultCache};
use crate::error::{Error, Result};
use crate::fallback::generate_fallback;
use crate::models::{total_quantity, validate_entries, RecyclingResult, ResultSource, WasteEntry};
use crate::prompts::{Prompt, PromptId, PromptLibrary};

/// Outcome of one analysis request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub result: RecyclingResult,
    pub source: ResultSource,
    /// Why the model result was not used (fallback only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Short digest of the canonical cache key
    pub cache_key: String,
    pub total_quantity: f64,
}

/// Why a model result could not be used
#[derive(Debug)]
enum ModelFailure {
    /// No AI backend configured
    Disabled,
    /// Transport error, error status or timeout
    Unreachable(String),
    /// The model answered but the reply was unusable
    BadReply(String),
}

impl ModelFailure {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    fn into_reason(self) -> String {
        match self {
            Self::Disabled => "AI backend disabled".to_string(),
            Self::Unreachable(reason) | Self::BadReply(reason) => reason,
        }
    }
}

/// Runs analyses against one model and one session cache
pub struct WasteAnalyzer {
    ai: Option<AIClient>,
    cache: Arc<ResultCache>,
    prompt: Prompt,
    timeout: Duration,
    /// Held while a cache miss is being resolved
    inflight: Mutex<()>,
}

impl WasteAnalyzer {
    /// Create an analyzer
    ///
    /// With `ai = None` every miss is answered by the fallback generator.
    pub fn new(
        ai: Option<AIClient>,
        cache: Arc<ResultCache>,
        prompts: &mut PromptLibrary,
        timeout: Duration,
    ) -> Result<Self> {
        let prompt = prompts.get(PromptId::AnalyzeWaste)?.clone();
        Ok(Self {
            ai,
            cache,
            prompt,
            timeout,
            inflight: Mutex::new(()),
        })
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Analyze a batch of waste entries
    ///
    /// Only invalid entries produce an error. A repeated batch (in any
    /// order) is served from the cache without contacting the model.
    pub async fn analyze(&self, entries: &[WasteEntry]) -> Result<Analysis> {
        validate_entries(entries)?;

        let key = CacheKey::from_entries(entries);
        let total = total_quantity(entries);

        if let Some(result) = self.cache.get(&key) {
            info!(key = %key.digest(), cached = self.cache.len(), "Analysis served from cache");
            return Ok(self.finish(result, ResultSource::Cache, None, &key, total));
        }

        let _guard = self.inflight.lock().await;

        // Another request may have resolved the same batch while we waited
        if let Some(result) = self.cache.get(&key) {
            info!(key = %key.digest(), "Analysis served from cache after wait");
            return Ok(self.finish(result, ResultSource::Cache, None, &key, total));
        }

        info!(
            key = %key.digest(),
            entries = entries.len(),
            total_kg = total,
            "Starting waste analysis"
        );

        let (result, source, reason, cacheable) = match self.ask_model(entries).await {
            Ok(result) => {
                info!(
                    key = %key.digest(),
                    efficiency = result.efficiency,
                    sustainability = result.sustainability,
                    outputs = result.outputs.len(),
                    "Model analysis complete"
                );
                (result, ResultSource::Model, None, true)
            }
            Err(failure) => {
                let cacheable = !failure.is_transient();
                let reason = failure.into_reason();
                warn!(key = %key.digest(), reason = %reason, cacheable, "Using fallback analysis");
                (
                    generate_fallback(total, entries),
                    ResultSource::Fallback,
                    Some(reason),
                    cacheable,
                )
            }
        };

        // Transport failures and timeouts are retried on the next submission
        if cacheable {
            self.cache.put(key.clone(), result.clone());
        }
        Ok(self.finish(result, source, reason, &key, total))
    }

    /// One model round trip
    async fn ask_model(&self, entries: &[WasteEntry]) -> std::result::Result<RecyclingResult, ModelFailure> {
        let ai = self.ai.as_ref().ok_or(ModelFailure::Disabled)?;

        let (system, user) = self.prompt.render_for_entries(entries);
        debug!(model = ai.model(), host = ai.host(), "Sending analysis request");

        let reply = match tokio::time::timeout(self.timeout, ai.chat_completion(&system, &user)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return Err(ModelFailure::Unreachable(e.to_string())),
            Err(_) => {
                return Err(ModelFailure::Unreachable(
                    Error::Timeout(self.timeout.as_secs()).to_string(),
                ))
            }
        };
        debug!(content = %reply, "Raw model reply");

        parse_model_reply(&reply).map_err(|e| ModelFailure::BadReply(e.to_string()))
    }

    fn finish(
        &self,
        result: RecyclingResult,
        source: ResultSource,
        fallback_reason: Option<String>,
        key: &CacheKey,
        total_quantity: f64,
    ) -> Analysis {
        Analysis {
            result,
            source,
            fallback_reason,
            cache_key: key.digest(),
            total_quantity,
        }
    }
}
