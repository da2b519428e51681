//! Material catalog and form option commands

use anyhow::{Context, Result};
use marsbars_core::materials::{search, SustainabilityLevel};
use marsbars_core::{MATERIAL_TYPES, SOURCE_CATEGORIES};

use super::truncate;

/// Search the material solution catalog
pub fn cmd_materials(query: &str, level: &str) -> Result<()> {
    let level: SustainabilityLevel = level.parse().context("Invalid --level")?;
    let matches = search(query, level);

    if matches.is_empty() {
        println!("No material solutions match '{}' ({}).", query, level);
        return Ok(());
    }

    println!("♻️  Material Solutions ({} found, level: {})\n", matches.len(), level);
    println!(
        "{:<42} {:<38} {:>6}",
        "INPUT MATERIAL", "OUTPUT PRODUCT", "SUST."
    );
    println!("{}", "-".repeat(88));

    for m in &matches {
        println!(
            "{:<42} {:<38} {:>5}%",
            truncate(m.input_material, 42),
            truncate(m.output_product, 38),
            m.sustainability
        );
    }

    if matches.len() == 1 {
        let m = matches[0];
        println!();
        println!("Input:     {}", m.input_description);
        println!("Output:    {}", m.output_description);
        println!("Rationale: {}", m.rationale);
        println!("Source:    {}", m.source);
    }

    Ok(())
}

/// List the values accepted for material type and source category
pub fn cmd_options() -> Result<()> {
    println!("Material types:");
    for material in MATERIAL_TYPES {
        println!("  - {}", material);
    }
    println!();
    println!("Source categories:");
    for source in SOURCE_CATEGORIES {
        println!("  - {}", source);
    }
    Ok(())
}
