//! Prerequisite graphs for quests and hideout station levels
//!
//! Both graphs share one implementation, parameterized by node type.
//! Uses petgraph for storage and structural checks. Unlike a build graph,
//! these graphs come from upstream data and are accepted as-is: duplicate
//! keys, unknown references and cycles are reported by
//! [`PrerequisiteGraph::check`] rather than rejected on load.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

use super::hideout::HideoutNode;
use super::quest::QuestNode;
use super::source::SourceKind;
use super::warning::DataWarning;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Node not found in {0} graph: {1}")]
    NodeNotFound(SourceKind, String),
}

/// A node that can live in a [`PrerequisiteGraph`]
pub trait GraphNode {
    type Key: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display;

    /// Which graph this node type forms
    const KIND: SourceKind;

    fn key(&self) -> &Self::Key;

    /// Declared prerequisites, including ones that may not resolve
    fn prerequisites(&self) -> &[Self::Key];

    fn is_completed(&self) -> bool;

    fn set_completed(&mut self, completed: bool);

    fn display_name(&self) -> String;
}

/// The quest prerequisite graph
pub type QuestGraph = PrerequisiteGraph<QuestNode>;

/// The hideout station-level graph
pub type HideoutGraph = PrerequisiteGraph<HideoutNode>;

/// A prerequisite graph over one node type
#[derive(Debug, Clone)]
pub struct PrerequisiteGraph<N: GraphNode> {
    /// Edge direction: prerequisite -> dependent
    graph: DiGraph<N, ()>,

    /// Map from key to node index
    node_map: HashMap<N::Key, NodeIndex>,

    /// Problems found while loading, reported again by `check`
    load_warnings: Vec<DataWarning>,
}

impl<N: GraphNode> Default for PrerequisiteGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: GraphNode> PrerequisiteGraph<N> {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            load_warnings: Vec::new(),
        }
    }

    /// Builds a graph from catalog nodes
    ///
    /// A repeated key keeps its first definition; later ones are dropped
    /// with a [`DataWarning::DuplicateNode`].
    pub fn from_nodes(nodes: impl IntoIterator<Item = N>) -> Self {
        let mut graph = Self::new();

        // First pass: add all nodes
        for node in nodes {
            if graph.node_map.contains_key(node.key()) {
                let warning = DataWarning::DuplicateNode {
                    graph: N::KIND,
                    node: node.key().to_string(),
                };
                tracing::warn!(code = warning.code(), "{}", warning);
                graph.record_warning(warning);
                continue;
            }
            let key = node.key().clone();
            let idx = graph.graph.add_node(node);
            graph.node_map.insert(key, idx);
        }

        // Second pass: add all resolvable edges
        let indices: Vec<_> = graph.graph.node_indices().collect();
        for idx in indices {
            graph.link(idx);
        }

        graph
    }

    /// Keeps a problem found while reading this graph's data
    ///
    /// Recorded warnings are listed first by [`check`](Self::check).
    pub fn record_warning(&mut self, warning: DataWarning) {
        if !self.load_warnings.contains(&warning) {
            self.load_warnings.push(warning);
        }
    }

    /// Adds edges from the node's resolvable prerequisites to the node
    fn link(&mut self, idx: NodeIndex) {
        let prerequisites: Vec<_> = self.graph[idx]
            .prerequisites()
            .iter()
            .filter_map(|key| self.node_map.get(key).copied())
            .collect();

        for prerequisite in prerequisites {
            self.graph.update_edge(prerequisite, idx, ());
        }
    }

    /// Returns true if the node exists and is complete
    pub fn is_complete(&self, key: &N::Key) -> bool {
        self.lookup(key).map(|n| n.is_completed()).unwrap_or(false)
    }

    /// Returns the declared prerequisites of a node (empty for unknown keys)
    pub fn prerequisites_of(&self, key: &N::Key) -> &[N::Key] {
        self.lookup(key).map(|n| n.prerequisites()).unwrap_or(&[])
    }

    /// Looks up a node by key
    pub fn lookup(&self, key: &N::Key) -> Option<&N> {
        self.node_map.get(key).map(|idx| &self.graph[*idx])
    }

    /// Returns the direct dependents of a node, sorted by key
    pub fn dependents(&self, key: &N::Key) -> Vec<N::Key> {
        let idx = match self.node_map.get(key) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut dependents: Vec<_> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter(|&other| other != idx)
            .map(|other| self.graph[other].key().clone())
            .collect();
        dependents.sort();
        dependents
    }

    /// Flips the completion flag of a node
    ///
    /// Returns whether the state changed. Callers must start a new
    /// calculation pass afterwards; see `engine::Planner`.
    pub fn set_completed(&mut self, key: &N::Key, completed: bool) -> Result<bool, GraphError> {
        let idx = *self
            .node_map
            .get(key)
            .ok_or_else(|| GraphError::NodeNotFound(N::KIND, key.to_string()))?;

        let node = &mut self.graph[idx];
        if node.is_completed() == completed {
            return Ok(false);
        }
        node.set_completed(completed);
        Ok(true)
    }

    /// Reports load problems, unresolved references, self references and cycles
    ///
    /// Each problem is listed once, even if a prerequisite is declared twice.
    pub fn check(&self) -> Vec<DataWarning> {
        let mut warnings = self.load_warnings.clone();

        for node in self.nodes() {
            for prerequisite in node.prerequisites() {
                let warning = if prerequisite == node.key() {
                    DataWarning::MalformedGraph {
                        graph: N::KIND,
                        nodes: vec![node.key().to_string()],
                    }
                } else if !self.contains(prerequisite) {
                    DataWarning::UnknownReference {
                        graph: N::KIND,
                        node: node.key().to_string(),
                        reference: prerequisite.to_string(),
                    }
                } else {
                    continue;
                };
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
            }
        }

        for component in tarjan_scc(&self.graph) {
            if component.len() > 1 {
                let mut nodes: Vec<_> = component
                    .iter()
                    .map(|&idx| self.graph[idx].key().to_string())
                    .collect();
                nodes.sort();
                warnings.push(DataWarning::MalformedGraph {
                    graph: N::KIND,
                    nodes,
                });
            }
        }

        warnings
    }

    /// Returns true if no prerequisite cycle (including self references) exists
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Iterates nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.graph.node_weights()
    }

    /// Iterates keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &N::Key> {
        self.nodes().map(|n| n.key())
    }

    /// Returns true if the graph contains the key
    pub fn contains(&self, key: &N::Key) -> bool {
        self.node_map.contains_key(key)
    }

    /// Returns the number of nodes
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns the number of completed nodes
    pub fn completed_count(&self) -> usize {
        self.nodes().filter(|n| n.is_completed()).count()
    }
}
