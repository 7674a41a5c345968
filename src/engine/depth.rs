//! Dependency depth
//!
//! Depth measures how many sequential unlocks stand between a node and
//! being actionable:
//!
//! - `0` - the node is complete, or every prerequisite is complete
//! - `n` - the maximum over incomplete prerequisites of `depth(p) + 1`
//!
//! A [`DepthCalculator`] borrows one graph snapshot and memoizes every depth
//! it computes. It lives for exactly one calculation pass; a new pass must
//! build a new calculator, so a completion change can never be answered
//! from a stale memo.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{trace, warn};

use crate::domain::{
    DataWarning, GraphError, GraphNode, HideoutGraph, HideoutKey, PrerequisiteGraph, QuestGraph,
    QuestId, SourceKind,
};

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Asked for a node the graph does not contain (an integration bug)
    #[error("Node not found in {0} graph: {1}")]
    NodeNotFound(SourceKind, String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Memoizing depth calculator scoped to one graph and one pass
#[derive(Debug)]
pub struct DepthCalculator<'g, N: GraphNode> {
    graph: &'g PrerequisiteGraph<N>,

    /// Depths computed during this pass
    memo: HashMap<N::Key, u32>,

    /// Nodes on the current walk path (cycle guard)
    visiting: HashSet<N::Key>,

    warnings: Vec<DataWarning>,
}

impl<'g, N: GraphNode> DepthCalculator<'g, N> {
    pub fn new(graph: &'g PrerequisiteGraph<N>) -> Self {
        Self {
            graph,
            memo: HashMap::new(),
            visiting: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns the dependency depth of a node
    ///
    /// Fails only if the key is not in this calculator's graph. Bad data
    /// (cycles, unknown prerequisites) degrades the answer instead.
    pub fn depth(&mut self, key: &N::Key) -> Result<u32, EngineError> {
        if !self.graph.contains(key) {
            return Err(EngineError::NodeNotFound(N::KIND, key.to_string()));
        }
        Ok(self.visit(key))
    }

    /// Depth of a key read from this calculator's own graph
    pub(crate) fn depth_of_member(&mut self, key: &N::Key) -> u32 {
        self.visit(key)
    }

    /// Post-order walk over an explicit stack
    fn visit(&mut self, key: &N::Key) -> u32 {
        if let Some(&depth) = self.memo.get(key) {
            return depth;
        }

        let graph = self.graph;
        let root = match graph.lookup(key) {
            Some(node) => node,
            None => return 0,
        };

        // (node, prerequisites already pushed)
        let mut stack: Vec<(&'g N, bool)> = vec![(root, false)];

        while let Some((node, expanded)) = stack.pop() {
            let key = node.key();

            if expanded {
                let depth = self.combine(node);
                self.visiting.remove(key);
                self.memo.insert(key.clone(), depth);
                trace!(graph = N::KIND.label(), node = %key, depth, "computed dependency depth");
                continue;
            }

            if self.memo.contains_key(key) {
                continue;
            }

            if node.is_completed() || node.prerequisites().is_empty() {
                self.memo.insert(key.clone(), 0);
                continue;
            }

            self.visiting.insert(key.clone());
            stack.push((node, true));

            // Reversed so the first prerequisite is walked first
            for prerequisite in node.prerequisites().iter().rev() {
                if self.visiting.contains(prerequisite) || self.memo.contains_key(prerequisite) {
                    continue;
                }
                if let Some(p) = graph.lookup(prerequisite) {
                    if !p.is_completed() {
                        stack.push((p, false));
                    }
                }
            }
        }

        self.memo.get(key).copied().unwrap_or(0)
    }

    /// Depth of a node whose reachable prerequisites are all memoized
    fn combine(&mut self, node: &N) -> u32 {
        let graph = self.graph;
        let key = node.key();

        let mut depth = 0;
        for prerequisite in node.prerequisites() {
            let contribution = match graph.lookup(prerequisite) {
                None => {
                    // One unknown blocker
                    self.warn(DataWarning::UnknownReference {
                        graph: N::KIND,
                        node: key.to_string(),
                        reference: prerequisite.to_string(),
                    });
                    1
                }
                Some(p) if p.is_completed() => 0,
                Some(_) => match self.memo.get(prerequisite) {
                    Some(&d) => d.saturating_add(1),
                    None => {
                        // Still on the walk path: counts as depth 0
                        self.warn(DataWarning::MalformedGraph {
                            graph: N::KIND,
                            nodes: vec![prerequisite.to_string(), key.to_string()],
                        });
                        1
                    }
                },
            };
            depth = depth.max(contribution);
        }
        depth
    }

    fn warn(&mut self, warning: DataWarning) {
        if !self.warnings.contains(&warning) {
            warn!(code = warning.code(), "{}", warning);
            self.warnings.push(warning);
        }
    }

    /// Number of memoized nodes
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    /// Data-quality warnings raised so far
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<DataWarning> {
        self.warnings
    }
}

/// Depth of a single quest, computed with a fresh memo
pub fn quest_depth(graph: &QuestGraph, id: &QuestId) -> Result<u32, EngineError> {
    DepthCalculator::new(graph).depth(id)
}

/// Depth of a single station level, computed with a fresh memo
pub fn station_depth(graph: &HideoutGraph, key: &HideoutKey) -> Result<u32, EngineError> {
    DepthCalculator::new(graph).depth(key)
}
