//! Quest domain model
//!
//! A quest unlocks once every prerequisite quest is complete and asks the
//! player to hand over items, some of which must be found in raid.

use serde::{Deserialize, Deserializer, Serialize};

use super::graph::GraphNode;
use super::id::QuestId;
use super::source::SourceKind;

/// One item line of a quest objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestItemRequirement {
    /// Upstream item id; validated during aggregation
    #[serde(default)]
    pub item: String,

    /// Upstream count; validated during aggregation
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: i64,

    /// Item must be found in raid (the special acquisition status)
    #[serde(default)]
    pub found_in_raid: bool,
}

/// Reads a requirement count, mapping anything but an integer to 0
///
/// Aggregation then skips the line with a warning instead of the whole
/// record failing to parse.
pub(super) fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64().unwrap_or(0))
}

/// A quest in the prerequisite graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestNode {
    /// Unique identifier
    pub id: QuestId,

    /// Display name
    pub name: String,

    /// Quests that must be complete before this one unlocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<QuestId>,

    /// Player level gate; carried for display, not used for priority
    #[serde(default)]
    pub min_level: u32,

    /// Completion state, layered on from the progress store
    #[serde(default)]
    pub completed: bool,

    /// Items handed over for this quest
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<QuestItemRequirement>,
}

impl QuestNode {
    /// Creates an incomplete quest without prerequisites or items
    pub fn new(id: QuestId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            prerequisites: Vec::new(),
            min_level: 0,
            completed: false,
            items: Vec::new(),
        }
    }

    /// Adds a prerequisite quest; returns false if it was already listed
    pub fn add_prerequisite(&mut self, id: QuestId) -> bool {
        if self.prerequisites.contains(&id) {
            return false;
        }
        self.prerequisites.push(id);
        true
    }

    /// Builder form of [`QuestNode::add_prerequisite`]
    pub fn with_prerequisite(mut self, id: QuestId) -> Self {
        self.add_prerequisite(id);
        self
    }

    /// Builder form for an item requirement line
    pub fn with_item(
        mut self,
        item: impl Into<String>,
        quantity: i64,
        found_in_raid: bool,
    ) -> Self {
        self.items.push(QuestItemRequirement {
            item: item.into(),
            quantity,
            found_in_raid,
        });
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

impl GraphNode for QuestNode {
    type Key = QuestId;

    const KIND: SourceKind = SourceKind::Quest;

    fn key(&self) -> &QuestId {
        &self.id
    }

    fn prerequisites(&self) -> &[QuestId] {
        &self.prerequisites
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
