//! Error types for Mars Bars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid waste entries: {0}")]
    InvalidEntries(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI request timed out after {0}s")]
    Timeout(u64),

    #[error("AI backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
