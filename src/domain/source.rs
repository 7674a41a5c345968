//! Requirement sources
//!
//! Every item requirement originates either from a quest or from one level
//! of a hideout station. The two never share a graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::{HideoutKey, QuestId};

/// Which prerequisite graph a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Quest,
    Hideout,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Quest => "quest",
            SourceKind::Hideout => "hideout",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reference to the node a requirement came from
///
/// Serialized as `{"kind": "quest", "id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SourceRef {
    Quest(QuestId),
    Hideout(HideoutKey),
}

impl SourceRef {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceRef::Quest(_) => SourceKind::Quest,
            SourceRef::Hideout(_) => SourceKind::Hideout,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Quest(id) => write!(f, "quest {}", id),
            SourceRef::Hideout(key) => write!(f, "hideout {}", key),
        }
    }
}

impl From<QuestId> for SourceRef {
    fn from(id: QuestId) -> Self {
        SourceRef::Quest(id)
    }
}

impl From<HideoutKey> for SourceRef {
    fn from(key: HideoutKey) -> Self {
        SourceRef::Hideout(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        let quest = SourceRef::from("debut".parse::<QuestId>().unwrap());
        let station = SourceRef::from("workbench:1".parse::<HideoutKey>().unwrap());

        assert_eq!(quest.kind(), SourceKind::Quest);
        assert_eq!(station.kind(), SourceKind::Hideout);
        assert_eq!(station.to_string(), "hideout workbench:1");
    }

    #[test]
    fn serializes_tagged() {
        let station = SourceRef::from("workbench:1".parse::<HideoutKey>().unwrap());
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "hideout", "id": "workbench:1"}));
    }
}
