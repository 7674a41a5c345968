//! JSONL catalogs for quests, station levels and items
//!
//! Each catalog file holds one JSON object per line:
//!
//! - `.stash/quests.jsonl`: one [`QuestNode`] per line
//! - `.stash/hideout.jsonl`: one [`HideoutNode`] per line
//! - `.stash/items.jsonl`: one [`ItemInfo`] per line
//!
//! Catalogs are read under a shared lock. A missing file reads as empty.
//! A line that does not parse is skipped and kept as a [`DataWarning`], so
//! one bad record never hides the rest of the catalog.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DataWarning, GraphNode, HideoutGraph, HideoutNode, ItemId, PrerequisiteGraph, QuestGraph,
    QuestNode,
};

/// Records read from one catalog, plus the lines that were skipped
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<DataWarning>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<N: GraphNode> Loaded<N> {
    /// Builds a graph that reports the skipped lines from `check`
    pub fn into_graph(self) -> PrerequisiteGraph<N> {
        let mut graph = PrerequisiteGraph::from_nodes(self.records);
        for warning in self.skipped {
            graph.record_warning(warning);
        }
        graph
    }
}

/// Source of quest definitions
pub trait QuestCatalog {
    fn quests(&self) -> Result<Loaded<QuestNode>>;

    /// Builds the quest graph from the catalog
    fn quest_graph(&self) -> Result<QuestGraph> {
        Ok(self.quests()?.into_graph())
    }
}

/// Source of hideout station level definitions
pub trait HideoutCatalog {
    fn stations(&self) -> Result<Loaded<HideoutNode>>;

    /// Builds the hideout graph from the catalog
    fn hideout_graph(&self) -> Result<HideoutGraph> {
        Ok(self.stations()?.into_graph())
    }
}

/// Source of item display metadata
pub trait ItemCatalog {
    fn items(&self) -> Result<ItemIndex>;
}

/// Display metadata for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

/// Item metadata keyed by id
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    items: HashMap<ItemId, ItemInfo>,
}

impl ItemIndex {
    pub fn new(items: impl IntoIterator<Item = ItemInfo>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|info| (info.id.clone(), info))
                .collect(),
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemInfo> {
        self.items.get(id)
    }

    /// Human-readable name, falling back to the raw id
    pub fn display_name(&self, id: &ItemId) -> String {
        self.items
            .get(id)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The catalog files of one project directory
pub struct JsonlCatalog {
    dir: PathBuf,
}

impl JsonlCatalog {
    /// Creates a catalog reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the default catalog for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".stash"))
    }

    pub fn quests_path(&self) -> PathBuf {
        self.dir.join("quests.jsonl")
    }

    pub fn hideout_path(&self) -> PathBuf {
        self.dir.join("hideout.jsonl")
    }

    pub fn items_path(&self) -> PathBuf {
        self.dir.join("items.jsonl")
    }
}

impl QuestCatalog for JsonlCatalog {
    fn quests(&self) -> Result<Loaded<QuestNode>> {
        read_jsonl(&self.quests_path(), "quest")
    }
}

impl HideoutCatalog for JsonlCatalog {
    fn stations(&self) -> Result<Loaded<HideoutNode>> {
        read_jsonl(&self.hideout_path(), "station level")
    }
}

impl ItemCatalog for JsonlCatalog {
    /// Item metadata is display-only, so skipped lines are just logged
    fn items(&self) -> Result<ItemIndex> {
        let loaded: Loaded<ItemInfo> = read_jsonl(&self.items_path(), "item")?;
        Ok(ItemIndex::new(loaded.records))
    }
}

/// Reads every non-blank line of a JSONL file
///
/// I/O and locking failures are errors; unparseable lines are skipped.
fn read_jsonl<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Loaded<T>> {
    if !path.exists() {
        return Ok(Loaded::default());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open catalog: {}", path.display()))?;

    file.lock_shared()
        .with_context(|| format!("Failed to acquire read lock on {}", path.display()))?;

    let reader = BufReader::new(&file);
    let mut loaded = Loaded::default();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                let warning = DataWarning::UnreadableRecord {
                    file: path.display().to_string(),
                    line: line_num + 1,
                    reason: format!("not a valid {}: {}", what, e),
                };
                warn!(code = warning.code(), "{}", warning);
                loaded.skipped.push(warning);
            }
        }
    }

    debug!(
        path = %path.display(),
        records = loaded.records.len(),
        skipped = loaded.skipped.len(),
        "read catalog"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn catalog_with(files: &[(&str, &str)]) -> (TempDir, JsonlCatalog) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let catalog = JsonlCatalog::new(dir.path());
        (dir, catalog)
    }

    #[test]
    fn missing_files_read_as_empty() {
        let (_dir, catalog) = catalog_with(&[]);

        assert!(catalog.quests().unwrap().records.is_empty());
        assert!(catalog.stations().unwrap().records.is_empty());
        assert!(catalog.items().unwrap().is_empty());
    }

    #[test]
    fn reads_quests_with_defaults() {
        let quests = r#"{"id":"debut","name":"Debut","items":[{"item":"shotgun","quantity":2}]}

{"id":"checking","name":"Checking","prerequisites":["debut"],"completed":true,"min_level":5}
"#;
        let (_dir, catalog) = catalog_with(&[("quests.jsonl", quests)]);

        let nodes = catalog.quests().unwrap().records;
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].items[0].item, "shotgun");
        assert_eq!(nodes[0].items[0].quantity, 2);
        assert!(!nodes[0].items[0].found_in_raid);
        assert!(!nodes[0].completed);
        assert!(nodes[1].completed);
        assert_eq!(nodes[1].min_level, 5);

        let graph = catalog.quest_graph().unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.completed_count(), 1);
    }

    #[test]
    fn reads_station_levels() {
        let hideout = r#"{"key":"generator:1","station_name":"Generator","items":[{"item":"bolts","quantity":3}]}
{"key":"generator:2","station_name":"Generator","prerequisites":["generator:1"]}
"#;
        let (_dir, catalog) = catalog_with(&[("hideout.jsonl", hideout)]);

        let graph = catalog.hideout_graph().unwrap();
        let key = "generator:2".parse().unwrap();
        assert_eq!(graph.prerequisites_of(&key).len(), 1);
    }

    #[test]
    fn unparseable_line_is_skipped_and_named() {
        let quests = "{\"id\":\"a\",\"name\":\"A\"}\nnot json\n{\"id\":\"b\",\"name\":\"B\"}\n";
        let (_dir, catalog) = catalog_with(&[("quests.jsonl", quests)]);

        let loaded = catalog.quests().unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].to_string().contains("quests.jsonl:2"));

        let graph = catalog.quest_graph().unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.check()[0].code(), "unreadable_record");
    }

    #[test]
    fn duplicate_quest_keeps_first_record() {
        let quests = "{\"id\":\"a\",\"name\":\"A\"}\n{\"id\":\"a\",\"name\":\"A again\"}\n";
        let (_dir, catalog) = catalog_with(&[("quests.jsonl", quests)]);

        let graph = catalog.quest_graph().unwrap();
        let a = "a".parse().unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.lookup(&a).unwrap().name, "A");

        let codes: Vec<_> = graph.check().iter().map(|w| w.code()).collect();
        assert_eq!(codes, vec!["duplicate_node"]);
    }

    #[test]
    fn bad_station_key_skips_only_that_line() {
        let hideout = concat!(
            r#"{"key":"generator","station_name":"Generator"}"#,
            "\n",
            r#"{"key":"generator:1","station_name":"Generator","items":[{"item":"bolts","quantity":3}]}"#,
            "\n",
        );
        let (_dir, catalog) = catalog_with(&[("hideout.jsonl", hideout)]);

        let loaded = catalog.stations().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].items[0].item, "bolts");
        assert_eq!(loaded.skipped[0].code(), "unreadable_record");
    }

    #[test]
    fn missing_quantity_keeps_the_record() {
        let quests = r#"{"id":"a","name":"A","items":[{"item":"gpu"},{"item":"bolts","quantity":2}]}"#;
        let (_dir, catalog) = catalog_with(&[("quests.jsonl", quests)]);

        let loaded = catalog.quests().unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.records[0].items[0].quantity, 0);
        assert_eq!(loaded.records[0].items[1].quantity, 2);
    }

    #[test]
    fn item_index_falls_back_to_id() {
        let items = r#"{"id":"gpu","name":"Graphics card","short_name":"GPU"}"#;
        let (_dir, catalog) = catalog_with(&[("items.jsonl", items)]);

        let index = catalog.items().unwrap();
        let gpu: ItemId = "gpu".parse().unwrap();
        let bolts: ItemId = "bolts".parse().unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.display_name(&gpu), "Graphics card");
        assert_eq!(index.get(&gpu).unwrap().short_name.as_deref(), Some("GPU"));
        assert_eq!(index.display_name(&bolts), "bolts");
    }
}
