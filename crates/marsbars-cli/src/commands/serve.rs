//! Server command implementation

use std::path::Path;

use anyhow::Result;
use marsbars_core::AppConfig;

pub async fn cmd_serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<&Path>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("🚀 Starting Mars Bars web server...");
    println!("   Listening: http://{}:{}", config.server.host, config.server.port);
    println!("   AI backend: {} ({})", config.ai.backend, config.ai.model);
    if config.ai.api_key.is_some() {
        println!("   API key: from ${}", config.ai.api_key_env);
    }
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if config.server.allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", config.server.allowed_origins.join(", "));
    }
    println!();

    let static_dir = static_dir.and_then(|p| p.to_str());
    marsbars_server::serve(config, static_dir).await
}
