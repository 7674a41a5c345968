//! Recalculation on completion changes
//!
//! [`Planner`] owns both graph snapshots and is the only place completion
//! state changes. Every mutation returns a fresh full pass, so a caller
//! cannot flip a flag and keep presenting the old result by accident.
//!
//! Each state change bumps a generation counter. A [`Snapshot`] remembers
//! the generation it was computed for; last write wins, and older snapshots
//! are to be discarded (see [`Planner::is_current`]).

use serde::Serialize;
use tracing::debug;

use crate::domain::{DataWarning, HideoutGraph, HideoutKey, QuestGraph, QuestId};

use super::aggregate::{aggregate, AggregateOptions, Aggregation};
use super::depth::{quest_depth, station_depth, EngineError};

/// The result of one pass, tagged with the state generation it reflects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    generation: u64,
    #[serde(flatten)]
    aggregation: Aggregation,
}

impl Snapshot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }
}

/// Both graphs plus the current view options
#[derive(Debug, Clone)]
pub struct Planner {
    quests: QuestGraph,
    hideout: HideoutGraph,
    options: AggregateOptions,
    generation: u64,
}

impl Planner {
    pub fn new(quests: QuestGraph, hideout: HideoutGraph, options: AggregateOptions) -> Self {
        Self {
            quests,
            hideout,
            options,
            generation: 0,
        }
    }

    pub fn quests(&self) -> &QuestGraph {
        &self.quests
    }

    pub fn hideout(&self) -> &HideoutGraph {
        &self.hideout
    }

    pub fn options(&self) -> AggregateOptions {
        self.options
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs a full pass against the current state
    pub fn recalculate(&self) -> Snapshot {
        debug!(generation = self.generation, "recalculating item priorities");
        Snapshot {
            generation: self.generation,
            aggregation: aggregate(&self.quests, &self.hideout, self.options),
        }
    }

    /// Marks a quest complete or incomplete and recalculates
    pub fn set_quest_completed(
        &mut self,
        id: &QuestId,
        completed: bool,
    ) -> Result<Snapshot, EngineError> {
        if self.quests.set_completed(id, completed)? {
            self.generation += 1;
            debug!(quest = %id, completed, generation = self.generation, "quest state changed");
        }
        Ok(self.recalculate())
    }

    /// Marks a station level built or unbuilt and recalculates
    pub fn set_station_completed(
        &mut self,
        key: &HideoutKey,
        completed: bool,
    ) -> Result<Snapshot, EngineError> {
        if self.hideout.set_completed(key, completed)? {
            self.generation += 1;
            debug!(station = %key, completed, generation = self.generation, "station state changed");
        }
        Ok(self.recalculate())
    }

    /// Switches between the active view and including completed nodes
    pub fn set_options(&mut self, options: AggregateOptions) -> Snapshot {
        if self.options != options {
            self.options = options;
            self.generation += 1;
        }
        self.recalculate()
    }

    /// Returns false for snapshots computed before the latest change
    pub fn is_current(&self, snapshot: &Snapshot) -> bool {
        snapshot.generation == self.generation
    }

    /// Dependency depth of a quest in the current state
    pub fn quest_depth(&self, id: &QuestId) -> Result<u32, EngineError> {
        quest_depth(&self.quests, id)
    }

    /// Dependency depth of a station level in the current state
    pub fn station_depth(&self, key: &HideoutKey) -> Result<u32, EngineError> {
        station_depth(&self.hideout, key)
    }

    /// Load and structural problems in either graph
    pub fn check(&self) -> Vec<DataWarning> {
        let mut warnings = self.quests.check();
        warnings.extend(self.hideout.check());
        warnings
    }
}
