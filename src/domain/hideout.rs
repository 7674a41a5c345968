//! Hideout station levels
//!
//! Each upgrade level of a station is its own node. Levels depend on earlier
//! levels of the same station and on levels of other stations.

use serde::{Deserialize, Serialize};

use super::graph::GraphNode;
use super::id::HideoutKey;
use super::quest::lenient_quantity;
use super::source::SourceKind;

/// One item line of a station upgrade (never found-in-raid)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideoutItemRequirement {
    /// Upstream item id; validated during aggregation
    #[serde(default)]
    pub item: String,

    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: i64,
}

/// One upgrade level of one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HideoutNode {
    /// `{station}:{level}`
    pub key: HideoutKey,

    /// Display name of the station (without level)
    pub station_name: String,

    /// Station levels that must be built first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<HideoutKey>,

    #[serde(default)]
    pub completed: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<HideoutItemRequirement>,
}

impl HideoutNode {
    pub fn new(key: HideoutKey, station_name: impl Into<String>) -> Self {
        Self {
            key,
            station_name: station_name.into(),
            prerequisites: Vec::new(),
            completed: false,
            items: Vec::new(),
        }
    }

    /// Adds a prerequisite level; returns false if it was already listed
    pub fn add_prerequisite(&mut self, key: HideoutKey) -> bool {
        if self.prerequisites.contains(&key) {
            return false;
        }
        self.prerequisites.push(key);
        true
    }

    pub fn with_prerequisite(mut self, key: HideoutKey) -> Self {
        self.add_prerequisite(key);
        self
    }

    pub fn with_item(mut self, item: impl Into<String>, quantity: i64) -> Self {
        self.items.push(HideoutItemRequirement {
            item: item.into(),
            quantity,
        });
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

impl GraphNode for HideoutNode {
    type Key = HideoutKey;

    const KIND: SourceKind = SourceKind::Hideout;

    fn key(&self) -> &HideoutKey {
        &self.key
    }

    fn prerequisites(&self) -> &[HideoutKey] {
        &self.prerequisites
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    fn display_name(&self) -> String {
        format!("{} L{}", self.station_name, self.key.level())
    }
}
