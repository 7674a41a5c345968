//! stash-planner - what to keep from a raid, and how urgently
//!
//! Walks the quest and hideout prerequisite graphs, collects every item they
//! still require, and sorts each item into an urgency tier by how many
//! unlocks stand between the player and the node that needs it.

pub mod domain;
pub mod engine;
pub mod storage;
pub mod cli;

pub use domain::{HideoutKey, HideoutNode, ItemId, QuestId, QuestNode};
pub use engine::{aggregate, AggregateOptions, AggregatedItem, Aggregation, Planner, Priority};
