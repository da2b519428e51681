//! JSON parsing helpers for model replies
//!
//! Chat models often wrap the JSON payload in markdown fences or surround it
//! with prose. These helpers strip that down to the first JSON object and
//! turn it into a `RecyclingResult`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{RecyclingOutput, RecyclingResult, ResourceUsage};

/// Why a model reply could not be used
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("No JSON object found in AI response | Raw: {0}")]
    NoJsonObject(String),

    #[error("Invalid JSON from AI: {0}")]
    InvalidJson(String),

    #[error("AI response is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Top-level fields a reply must carry to be accepted
pub const REQUIRED_FIELDS: [&str; 4] = ["outputs", "resourceUsage", "benefits", "drawbacks"];

/// Raw reply shape; required fields are checked explicitly so a missing one
/// is reported by name instead of as a generic serde error
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReply {
    outputs: Option<Vec<RecyclingOutput>>,
    resource_usage: Option<ResourceUsage>,
    benefits: Option<Vec<String>>,
    drawbacks: Option<Vec<String>>,
    #[serde(default)]
    efficiency: Option<f64>,
    #[serde(default)]
    sustainability: Option<f64>,
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    // ```json, ```JSON, or a bare ``` plus trailing whitespace
    FENCE.get_or_init(|| Regex::new(r"```(?:json|JSON)?\s*").expect("valid fence regex"))
}

/// Remove markdown code fences from a reply
pub fn strip_code_fences(text: &str) -> String {
    fence_pattern().replace_all(text.trim(), "").into_owned()
}

/// Find the first balanced `{...}` object in the text
///
/// Braces inside JSON string literals are ignored, so a `}` in a benefit
/// sentence does not end the object early.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max).collect::<String>())
    }
}

/// Parse a free-form model reply into a recycling result
///
/// Fails when no JSON object is present, when it is malformed, or when any
/// of `outputs`, `resourceUsage`, `benefits`, `drawbacks` is absent. Missing
/// scores default to 0. The result is normalized to displayable ranges.
pub fn parse_model_reply(text: &str) -> Result<RecyclingResult, ParseError> {
    let cleaned = strip_code_fences(text);
    let json_str =
        extract_json_object(&cleaned).ok_or_else(|| ParseError::NoJsonObject(truncate(&cleaned, 200)))?;

    let raw: RawReply = serde_json::from_str(json_str).map_err(|e| {
        ParseError::InvalidJson(format!("{} | Raw: {}", e, truncate(json_str, 200)))
    })?;

    let outputs = raw.outputs.ok_or(ParseError::MissingField("outputs"))?;
    let resource_usage = raw
        .resource_usage
        .ok_or(ParseError::MissingField("resourceUsage"))?;
    let benefits = raw.benefits.ok_or(ParseError::MissingField("benefits"))?;
    let drawbacks = raw.drawbacks.ok_or(ParseError::MissingField("drawbacks"))?;

    Ok(RecyclingResult {
        outputs,
        resource_usage,
        benefits,
        drawbacks,
        efficiency: raw.efficiency.unwrap_or(0.0),
        sustainability: raw.sustainability.unwrap_or(0.0),
    }
    .normalized())
}
