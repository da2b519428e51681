//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the config file and environment
//! - `truncate` - Shorten table cells

use std::path::Path;

use anyhow::{Context, Result};
use marsbars_core::AppConfig;

/// Load config from an explicit path, the data dir override, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = AppConfig::load(path).context("Failed to load configuration")?;
    tracing::debug!(
        backend = %config.ai.backend,
        endpoint = %config.ai.endpoint(),
        model = %config.ai.model,
        api_key = config.ai.api_key.is_some(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
