//! Mars Bars Core Library
//!
//! Shared functionality for the Mars waste recycling analyzer:
//! - Waste entry and recycling result models
//! - Order-independent cache keys and the session result cache
//! - Pluggable chat-completion backends (OpenAI-compatible, mock)
//! - Model reply parsing and the deterministic fallback generator
//! - Prompt library for customizable analysis instructions
//! - Report export, material solution catalog and summary figures

pub mod ai;
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod fallback;
pub mod materials;
pub mod models;
pub mod prompts;
pub mod summary;

/// Test utilities including mock chat-completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    parse_model_reply, AIClient, AnalysisBackend, MockBackend, MockReply, OpenAICompatibleBackend,
    ParseError,
};
pub use analyzer::{Analysis, WasteAnalyzer};
pub use cache::{CacheKey, ResultCache};
pub use config::{AiConfig, AppConfig, ServerSettings};
pub use error::{Error, Result};
pub use export::{export_filename, ExportReport};
pub use fallback::generate_fallback;
pub use materials::{MaterialSolution, SustainabilityLevel};
pub use models::{
    total_quantity, validate_entries, RecyclingOutput, RecyclingResult, ResourceUsage,
    ResultSource, WasteEntry, MATERIAL_TYPES, MAX_TOTAL_QUANTITY_KG, SOURCE_CATEGORIES,
};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use summary::{ReportSummary, ScoreRating};
