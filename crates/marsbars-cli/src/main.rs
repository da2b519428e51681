//! Mars Bars CLI - Mars waste recycling analyzer
//!
//! Usage:
//!   marsbars analyze --entry "Aluminum:5:Research Equipment"   Analyze waste
//!   marsbars materials --query cotton --level high             Search solutions
//!   marsbars serve --port 3008                                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze {
            entries,
            file,
            export_dir,
            offline,
            json,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let options = commands::AnalyzeOptions {
                export_dir,
                offline,
                json,
            };
            commands::cmd_analyze(&config, &entries, file.as_deref(), &options).await
        }
        Commands::Materials { query, level } => commands::cmd_materials(&query, &level),
        Commands::Options => commands::cmd_options(),
        Commands::Import { file } => commands::cmd_import(&file),
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_serve(config, host, port, static_dir.as_deref()).await
        }
    }
}
