//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `status`, `check` |
//! | Shopping list | Aggregated item needs | `needs`, `needs --priority now`, `item` |
//! | Progress | Completion tracking | `quest done`, `station reopen`, `quest show` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default comes from `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! stash --verbose needs
//! ```
//! `RUST_LOG` takes precedence for library log output.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod needs;
mod progress;
mod query;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
