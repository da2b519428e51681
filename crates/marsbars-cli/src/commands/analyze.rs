//! Waste analysis command implementation

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use marsbars_core::{
    AIClient, Analysis, AppConfig, ExportReport, PromptLibrary, ReportSummary, ResultCache,
    ResultSource, WasteAnalyzer, WasteEntry,
};

use super::truncate;

/// Flags for `marsbars analyze`
#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub export_dir: Option<PathBuf>,
    pub offline: bool,
    pub json: bool,
}

/// Entry files may be a bare array or wrapped in `{"entries": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum EntriesFile {
    List(Vec<WasteEntry>),
    Wrapped { entries: Vec<WasteEntry> },
}

pub async fn cmd_analyze(
    config: &AppConfig,
    specs: &[String],
    file: Option<&Path>,
    options: &AnalyzeOptions,
) -> Result<()> {
    let entries = collect_entries(specs, file)?;

    let ai = if options.offline {
        None
    } else {
        AIClient::from_config(&config.ai)?
    };
    let analyzer = WasteAnalyzer::new(
        ai,
        Arc::new(ResultCache::new()),
        &mut PromptLibrary::new(),
        config.ai.timeout(),
    )?;

    if !options.json {
        println!("🔬 Analyzing {} waste entr{}...", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
    }

    let analysis = analyzer.analyze(&entries).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&entries, &analysis);
    }

    if let Some(ref dir) = options.export_dir {
        let report = ExportReport::new(entries, analysis.result);
        let path = report
            .write_to_dir(dir)
            .with_context(|| format!("Failed to export report to {}", dir.display()))?;
        if !options.json {
            println!();
            println!("💾 Report saved: {}", path.display());
        }
    }

    Ok(())
}

/// Gather entries from `--entry` specs and an optional JSON file
///
/// Entries without an id get one derived from the current time.
pub fn collect_entries(specs: &[String], file: Option<&Path>) -> Result<Vec<WasteEntry>> {
    let mut entries = Vec::new();

    if let Some(path) = file {
        entries.extend(load_entries_file(path)?);
    }
    for spec in specs {
        entries.push(parse_entry_spec(spec)?);
    }

    if entries.is_empty() {
        bail!("No waste entries given. Use --entry TYPE:KG:SOURCE or --file entries.json");
    }

    let base = chrono::Utc::now().timestamp_millis();
    for (i, entry) in entries.iter_mut().enumerate() {
        if entry.id.is_empty() {
            entry.id = (base + i as i64).to_string();
        }
    }

    Ok(entries)
}

/// Parse `TYPE:KG:SOURCE[:CONTAMINATION[:NOTES]]`
///
/// Notes may themselves contain colons. An empty contamination field is
/// skipped, so `Aluminum:5:Research Equipment::bent struts` is valid.
pub fn parse_entry_spec(spec: &str) -> Result<WasteEntry> {
    let parts: Vec<&str> = spec.splitn(5, ':').map(str::trim).collect();
    if parts.len() < 3 {
        bail!(
            "Invalid entry '{}': expected TYPE:KG:SOURCE[:CONTAMINATION[:NOTES]]",
            spec
        );
    }

    let quantity: f64 = parts[1]
        .parse()
        .with_context(|| format!("Invalid quantity '{}' in entry '{}'", parts[1], spec))?;

    let mut entry = WasteEntry::new(String::new(), parts[0], quantity, parts[2]);

    if let Some(cont) = parts.get(3).filter(|c| !c.is_empty()) {
        let percent: f64 = cont
            .trim_end_matches('%')
            .parse()
            .with_context(|| format!("Invalid contamination '{}' in entry '{}'", cont, spec))?;
        entry = entry.with_contamination(percent);
    }
    if let Some(notes) = parts.get(4).filter(|n| !n.is_empty()) {
        entry = entry.with_description(*notes);
    }

    Ok(entry)
}

fn load_entries_file(path: &Path) -> Result<Vec<WasteEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read entries file: {}", path.display()))?;
    let parsed: EntriesFile = serde_json::from_str(&content)
        .with_context(|| format!("Entries file is not a list of waste entries: {}", path.display()))?;
    Ok(match parsed {
        EntriesFile::List(entries) | EntriesFile::Wrapped { entries } => entries,
    })
}

fn print_analysis(entries: &[WasteEntry], analysis: &Analysis) {
    let result = &analysis.result;
    let summary = ReportSummary::build(entries, result);

    println!();
    println!("♻️  Recycling Report");
    println!("   Source: {}", analysis.source);
    if analysis.source == ResultSource::Fallback {
        if let Some(ref reason) = analysis.fallback_reason {
            println!("   ⚠️  AI analysis unavailable ({}), showing estimated results", reason);
        }
    }
    println!("   Total waste: {:.2} kg", analysis.total_quantity);
    println!(
        "   Efficiency: {:.1}% ({})   Sustainability: {:.1}% ({})",
        result.efficiency,
        summary.efficiency_rating.as_str(),
        result.sustainability,
        summary.sustainability_rating.as_str()
    );

    println!();
    println!("Waste by material:");
    for share in &summary.by_material {
        println!("  {:<30} {:>10.2} kg", share.label, share.quantity);
    }
    println!("Waste by source:");
    for share in &summary.by_source {
        println!("  {:<30} {:>10.2} kg", share.label, share.quantity);
    }

    println!();
    println!("{:<40} {:>10} {:<6}  {}", "OUTPUT", "QTY", "UNIT", "USES");
    println!("{}", "-".repeat(90));
    for output in &result.outputs {
        println!(
            "{:<40} {:>10.2} {:<6}  {}",
            truncate(&output.product_type, 40),
            output.quantity,
            output.unit,
            output.suggested_uses.join(", ")
        );
    }

    println!();
    println!(
        "Resources: {:.2} kWh energy, {:.2} L water, {:.2} h processing",
        result.resource_usage.energy, result.resource_usage.water, result.resource_usage.processing_time
    );

    println!();
    println!("Benefits:");
    for benefit in &result.benefits {
        println!("  + {}", benefit);
    }
    println!("Drawbacks:");
    for drawback in &result.drawbacks {
        println!("  - {}", drawback);
    }
}
