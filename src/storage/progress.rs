//! Completion progress
//!
//! Player progress lives in `.stash/progress.json`, separate from the
//! catalogs, so a catalog refresh never loses what the player has done.
//! Entries map a quest id or hideout key to the time it was completed.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{HideoutGraph, HideoutKey, QuestGraph, QuestId};

/// Completed quests and station levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub quests: BTreeMap<QuestId, DateTime<Utc>>,

    #[serde(default)]
    pub stations: BTreeMap<HideoutKey, DateTime<Utc>>,
}

impl Progress {
    pub fn is_quest_done(&self, id: &QuestId) -> bool {
        self.quests.contains_key(id)
    }

    pub fn is_station_done(&self, key: &HideoutKey) -> bool {
        self.stations.contains_key(key)
    }

    /// Records or clears a quest completion; returns whether anything changed
    pub fn mark_quest(&mut self, id: &QuestId, completed: bool) -> bool {
        if completed {
            if self.quests.contains_key(id) {
                return false;
            }
            self.quests.insert(id.clone(), Utc::now());
            true
        } else {
            self.quests.remove(id).is_some()
        }
    }

    /// Records or clears a station level; returns whether anything changed
    pub fn mark_station(&mut self, key: &HideoutKey, completed: bool) -> bool {
        if completed {
            if self.stations.contains_key(key) {
                return false;
            }
            self.stations.insert(key.clone(), Utc::now());
            true
        } else {
            self.stations.remove(key).is_some()
        }
    }

    /// Copies recorded completions onto freshly loaded graphs
    ///
    /// Entries for nodes no longer in the catalog are skipped and counted.
    pub fn apply(&self, quests: &mut QuestGraph, hideout: &mut HideoutGraph) -> usize {
        let mut stale = 0;

        for id in self.quests.keys() {
            if quests.set_completed(id, true).is_err() {
                warn!(quest = %id, "progress entry for unknown quest");
                stale += 1;
            }
        }

        for key in self.stations.keys() {
            if hideout.set_completed(key, true).is_err() {
                warn!(station = %key, "progress entry for unknown station level");
                stale += 1;
            }
        }

        stale
    }
}

/// Store for [`Progress`] in JSON format
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Creates a new progress store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".stash").join("progress.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads progress, or an empty record if nothing was saved yet
    pub fn read(&self) -> Result<Progress> {
        if !self.path.exists() {
            return Ok(Progress::default());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open progress: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on progress")?;

        serde_json::from_reader(BufReader::new(&file))
            .with_context(|| format!("Failed to parse progress: {}", self.path.display()))
    }

    /// Writes progress (temp file + atomic rename)
    pub fn write(&self, progress: &Progress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on progress")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, progress)
                .context("Failed to serialize progress")?;
            writeln!(writer).context("Failed to write progress")?;
            writer.flush().context("Failed to flush progress")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }

    /// Reads, applies `f`, and writes back if `f` reports a change
    pub fn update<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Progress) -> bool,
    {
        let mut progress = self.read()?;
        let changed = f(&mut progress);
        if changed {
            self.write(&progress)?;
        }
        Ok(changed)
    }
}
