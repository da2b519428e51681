//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mars Bars - Turn habitat waste into useful materials
#[derive(Parser)]
#[command(name = "marsbars")]
#[command(about = "Mars waste recycling analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze waste entries and print a recycling report
    Analyze {
        /// Entry as TYPE:KG:SOURCE[:CONTAMINATION[:NOTES]] (repeatable)
        ///
        /// Example: --entry "Plastics (PET):10:Life Support Systems:5:clean bottles"
        #[arg(short, long = "entry")]
        entries: Vec<String>,

        /// JSON file with an array of entries (or {"entries": [...]})
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write the report JSON into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Skip the AI model and use the deterministic generator
        #[arg(long)]
        offline: bool,

        /// Print the analysis as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search the material solution catalog
    Materials {
        /// Substring of material, product or description
        #[arg(short, long, default_value = "")]
        query: String,

        /// Sustainability band: all, high, medium, low
        #[arg(short, long, default_value = "all")]
        level: String,
    },

    /// List the material types and source categories entries may use
    Options,

    /// Import waste entries from a CSV file (not supported yet)
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Manage AI prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., analyze_waste)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
