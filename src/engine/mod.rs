//! # Item Priority Engine
//!
//! Pure, synchronous computation over graph snapshots. Nothing in here
//! performs I/O or mutates a graph except [`Planner`].
//!
//! ## Pipeline
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Collect requirement lines | `aggregate` | `ItemRequirementEdge`s |
//! | Fold per item | `aggregate` | one `AggregatedItem` per item id |
//! | Depth per source | `depth` | unlock steps to actionable |
//! | Tier per source, merge per item | `priority` | `NEED_NOW` / `NEED_SOON` / `NEED_LATER` |
//!
//! ## Tiers
//!
//! | Depth | Tier |
//! |-------|------|
//! | 0 | `NEED_NOW` |
//! | 1-2 | `NEED_SOON` |
//! | 3+ | `NEED_LATER` |

mod depth;
mod priority;
mod aggregate;
mod recalc;

pub use depth::{quest_depth, station_depth, DepthCalculator, EngineError};
pub use priority::{classify, merge_sources, ParsePriorityError, Priority, SOON_MAX_DEPTH};
pub use aggregate::{
    aggregate, requirement_edges, AggregateOptions, AggregatedItem, Aggregation,
    ItemRequirementEdge, ItemSource, PrioritySummary,
};
pub use recalc::{Planner, Snapshot};
