//! CSV import command

use std::path::Path;

use anyhow::{bail, Result};

/// CSV import has no column contract yet, so every call errors
pub fn cmd_import(file: &Path) -> Result<()> {
    bail!(
        "CSV import is not implemented ({}). Pass entries with --entry or a JSON file with `marsbars analyze --file`.",
        file.display()
    )
}
