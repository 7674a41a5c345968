//! # Storage Layer
//!
//! Persistence for stash-planner with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Quests | JSONL (one quest per line) | `.stash/quests.jsonl` |
//! | Station levels | JSONL (one level per line) | `.stash/hideout.jsonl` |
//! | Item names | JSONL (one item per line) | `.stash/items.jsonl` |
//! | Progress | JSON | `.stash/progress.json` |
//! | Config | TOML | `.stash/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - Catalogs and progress are read under a shared `fs2` lock
//! - [`ProgressStore`] writes under an exclusive lock, via temp file + rename
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for a stash project
//! - [`JsonlCatalog`] - Reads quests, station levels and item names
//! - [`ProgressStore`] - Reads/writes completion progress
//! - [`Config`] - Project and global configuration

mod catalog;
mod config;
mod progress;
mod project;

pub use catalog::{
    HideoutCatalog, ItemCatalog, ItemIndex, ItemInfo, JsonlCatalog, Loaded, QuestCatalog,
};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use progress::{Progress, ProgressStore};
pub use project::{Project, ProjectError};
