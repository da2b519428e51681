//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Waste analysis and report export
//! - `catalog` - Material solution search and form options
//! - `core` - Shared utilities (config loading, formatting)
//! - `import` - CSV import placeholder
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod analyze;
pub mod catalog;
pub mod core;
pub mod import;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use catalog::*;
pub use core::*;
pub use import::*;
pub use prompts::*;
pub use serve::*;
