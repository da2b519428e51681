//! Prompts-related command implementations

use anyhow::{bail, Result};
use marsbars_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

use super::truncate;

/// List all available prompts and their override status
pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();
    let prompts = library.list();

    println!("Available Prompts:\n");

    println!(
        "{:<20} {:>7}  {:<40}  {}",
        "ID", "VERSION", "DESCRIPTION", "OVERRIDE"
    );
    println!("{}", "-".repeat(80));

    for info in prompts {
        let override_status = if info.has_override {
            "✓ Custom"
        } else {
            "Default"
        };

        println!(
            "{:<20} {:>7}  {:<40}  {}",
            info.id,
            info.version,
            truncate(&info.description, 40),
            override_status
        );
    }

    println!();
    println!(
        "Override directory: {}",
        default_prompts_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory");
    println!("  2. Edit the file with your changes");
    println!("  3. Restart the server to use the new prompt");

    Ok(())
}

/// Resolve a prompt ID string
pub fn parse_prompt_id(prompt_id: &str) -> Result<PromptId> {
    match PromptId::all().iter().find(|id| id.as_str() == prompt_id) {
        Some(id) => Ok(*id),
        None => {
            let known: Vec<_> = PromptId::all().iter().map(|id| id.as_str()).collect();
            bail!(
                "Unknown prompt ID: {} (available: {})",
                prompt_id,
                known.join(", ")
            )
        }
    }
}

/// Show the content of a specific prompt
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let id = parse_prompt_id(prompt_id)?;
    let mut library = PromptLibrary::new();
    let prompt = library.get(id)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    println!("Description: {}", prompt.metadata.description);
    println!(
        "Source: {}",
        if prompt.is_override {
            "Override"
        } else {
            "Default"
        }
    );

    if let Some(ref path) = prompt.override_path {
        println!("Override Path: {}", path.display());
    }

    println!();
    println!("--- Content ---");
    println!("{}", prompt.content);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
