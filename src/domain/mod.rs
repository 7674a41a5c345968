//! Domain models for stash-planner
//!
//! Quest and hideout graphs plus their identifiers, without any I/O concerns.

mod id;
mod source;
mod warning;
mod quest;
mod hideout;
mod graph;

pub use id::{HideoutKey, IdError, ItemId, QuestId, StationId};
pub use source::{SourceKind, SourceRef};
pub use warning::DataWarning;
pub use quest::{QuestItemRequirement, QuestNode};
pub use hideout::{HideoutItemRequirement, HideoutNode};
pub use graph::{GraphError, GraphNode, HideoutGraph, PrerequisiteGraph, QuestGraph};
