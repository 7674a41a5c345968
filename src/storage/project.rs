//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

use crate::engine::Planner;

use super::{
    Config, HideoutCatalog, ItemCatalog, ItemIndex, JsonlCatalog, ProgressStore, QuestCatalog,
};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a stash project. Run 'stash init' first.")]
    NotInProject,
}

/// A stash project: catalogs, progress and configuration under `.stash/`
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let stash_dir = root.join(".stash");

        if !stash_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left alone, so running it twice is harmless.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let stash_dir = root.join(".stash");

        fs::create_dir_all(&stash_dir).with_context(|| {
            format!("Failed to create .stash directory: {}", stash_dir.display())
        })?;

        let config_path = stash_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# stash-planner configuration

# Enrich item ids with names from items.jsonl
item_catalog = true

[view]
# Count items still listed on completed quests / built station levels
include_completed_quests = false
include_completed_hideout = false
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let catalog = JsonlCatalog::new(&stash_dir);
        for path in [
            catalog.quests_path(),
            catalog.hideout_path(),
            catalog.items_path(),
        ] {
            if !path.exists() {
                fs::write(&path, "")
                    .with_context(|| format!("Failed to create catalog: {}", path.display()))?;
            }
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .stash directory path
    pub fn stash_dir(&self) -> PathBuf {
        self.root.join(".stash")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the catalog files
    pub fn catalog(&self) -> JsonlCatalog {
        JsonlCatalog::for_project(&self.root)
    }

    /// Returns the progress store
    pub fn progress_store(&self) -> ProgressStore {
        ProgressStore::for_project(&self.root)
    }

    /// Item names, or an empty index when the item catalog is disabled
    pub fn items(&self) -> Result<ItemIndex> {
        if !self.config.project.item_catalog {
            return Ok(ItemIndex::default());
        }
        self.catalog().items()
    }

    /// Loads both graphs, applies saved progress and returns a planner
    pub fn planner(&self) -> Result<Planner> {
        let catalog = self.catalog();
        let mut quests = catalog.quest_graph()?;
        let mut hideout = catalog.hideout_graph()?;

        let progress = self.progress_store().read()?;
        let stale = progress.apply(&mut quests, &mut hideout);

        debug!(
            quests = quests.len(),
            stations = hideout.len(),
            stale_progress = stale,
            "loaded project"
        );

        Ok(Planner::new(quests, hideout, self.config.project.view))
    }
}
