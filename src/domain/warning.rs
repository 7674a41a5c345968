//! Data-quality warnings
//!
//! Upstream catalogs are not trusted. Problems found in them degrade the
//! result (conservative depths, skipped requirement lines) and are reported
//! as warnings, never as errors.

use serde::Serialize;
use thiserror::Error;

use super::source::SourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// A prerequisite cycle or a node listing itself as prerequisite
    #[error("{graph} graph has a prerequisite cycle through {}", .nodes.join(" -> "))]
    MalformedGraph { graph: SourceKind, nodes: Vec<String> },

    /// A prerequisite that resolves to no known node
    #[error("{graph} node {node} requires unknown prerequisite {reference}")]
    UnknownReference {
        graph: SourceKind,
        node: String,
        reference: String,
    },

    /// A key defined more than once; the first definition is kept
    #[error("{graph} node {node} is defined more than once; later definitions are ignored")]
    DuplicateNode { graph: SourceKind, node: String },

    /// A catalog line that could not be read as a record
    #[error("skipped unreadable record at {file}:{line}: {reason}")]
    UnreadableRecord {
        file: String,
        line: usize,
        reason: String,
    },

    /// A requirement line that cannot be counted
    #[error("skipped requirement of '{item}' from {origin}: {reason}")]
    InvalidRequirement {
        origin: String,
        item: String,
        reason: String,
    },
}

impl DataWarning {
    /// Returns a short machine-friendly code
    pub fn code(&self) -> &'static str {
        match self {
            DataWarning::MalformedGraph { .. } => "malformed_graph",
            DataWarning::UnknownReference { .. } => "unknown_reference",
            DataWarning::DuplicateNode { .. } => "duplicate_node",
            DataWarning::UnreadableRecord { .. } => "unreadable_record",
            DataWarning::InvalidRequirement { .. } => "invalid_requirement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_nodes() {
        let warning = DataWarning::MalformedGraph {
            graph: SourceKind::Quest,
            nodes: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            warning.to_string(),
            "quest graph has a prerequisite cycle through a -> b"
        );
        assert_eq!(warning.code(), "malformed_graph");
    }

    #[test]
    fn unreadable_record_names_file_and_line() {
        let warning = DataWarning::UnreadableRecord {
            file: ".stash/quests.jsonl".into(),
            line: 4,
            reason: "expected value at line 1 column 1".into(),
        };
        assert_eq!(
            warning.to_string(),
            "skipped unreadable record at .stash/quests.jsonl:4: expected value at line 1 column 1"
        );
        assert_eq!(warning.code(), "unreadable_record");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let warning = DataWarning::UnknownReference {
            graph: SourceKind::Hideout,
            node: "workbench:2".into(),
            reference: "generator:9".into(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unknown_reference");
        assert_eq!(json["graph"], "hideout");
    }
}
