//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/marsbars/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables are applied on top:
//! - `AI_BACKEND`: openai_compatible, mock or none
//! - `MARSBARS_AI_HOST`: chat-completion server base URL
//! - `MARSBARS_AI_MODEL`: model identifier
//! - the variable named by `ai.api_key_env` (default `MARSBARS_AI_API_KEY`):
//!   bearer token for the chat-completion API

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/marsbars.toml");

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Chat-completion backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// openai_compatible, mock or none
    pub backend: String,
    pub base_url: String,
    /// Path appended to `base_url` for chat completions
    pub completions_path: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    /// Sent as `HTTP-Referer` when set
    pub referer: Option<String>,
    /// Sent as `X-Title` when set
    pub title: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Resolved from `api_key_env`, never read from the file
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: "openai_compatible".to_string(),
            base_url: "https://ai.hackclub.com".to_string(),
            completions_path: "/chat/completions".to_string(),
            model: "openai/gpt-oss-120b".to_string(),
            timeout_secs: 30,
            temperature: None,
            referer: None,
            title: None,
            api_key_env: "MARSBARS_AI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Full chat-completion endpoint URL
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.completions_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3008,
            allowed_origins: vec![],
        }
    }
}

impl AppConfig {
    /// Load config (override first, then default), then apply environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_file(override_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML document without touching the environment
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    fn validate(&self) -> Result<()> {
        match self.ai.backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" | "mock" | "none" => {}
            other => {
                return Err(Error::Config(format!("unknown ai.backend '{}'", other)));
            }
        }
        if self.ai.model.trim().is_empty() {
            return Err(Error::Config("ai.model must not be empty".into()));
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(backend) = std::env::var("AI_BACKEND") {
            self.ai.backend = backend;
        }
        if let Ok(host) = std::env::var("MARSBARS_AI_HOST") {
            self.ai.base_url = host;
        }
        if let Ok(model) = std::env::var("MARSBARS_AI_MODEL") {
            self.ai.model = model;
        }
        self.ai.api_key = std::env::var(&self.ai.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("marsbars").join("config.toml"))
}

/// Default data directory (prompt overrides, exports)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("marsbars"))
}

fn load_file(override_path: Option<&Path>) -> Result<AppConfig> {
    let path = match override_path {
        Some(p) => {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config override");
            let content = fs::read_to_string(&path)?;
            AppConfig::from_toml(&content)
        }
        None => AppConfig::embedded(),
    }
}
