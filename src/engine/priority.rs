//! Urgency tiers
//!
//! A requirement's tier is derived from the dependency depth of the node it
//! comes from. When an item is needed by several nodes, the most urgent tier
//! wins: an item blocking something actionable today is never shown as
//! "later" just because a far-off goal also wants it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest depth still classified as [`Priority::NeedSoon`]
pub const SOON_MAX_DEPTH: u32 = 2;

#[derive(Debug, Error, PartialEq)]
#[error("Unknown priority '{0}': expected now, soon or later")]
pub struct ParsePriorityError(String);

/// Urgency tier of an item requirement
///
/// Ordered by urgency: `NeedNow > NeedSoon > NeedLater`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Depth 0: the source is actionable right now
    NeedNow,
    /// Depth 1 or 2: one or two unlocks away
    NeedSoon,
    /// Depth 3 or more
    NeedLater,
}

impl Priority {
    /// All tiers, most urgent first
    pub const ALL: [Priority; 3] = [Priority::NeedNow, Priority::NeedSoon, Priority::NeedLater];

    /// Maps a dependency depth to its tier
    pub fn classify(depth: u32) -> Self {
        match depth {
            0 => Priority::NeedNow,
            1..=SOON_MAX_DEPTH => Priority::NeedSoon,
            _ => Priority::NeedLater,
        }
    }

    fn urgency(self) -> u8 {
        match self {
            Priority::NeedNow => 2,
            Priority::NeedSoon => 1,
            Priority::NeedLater => 0,
        }
    }

    /// Serialized name, e.g. `NEED_NOW`
    pub fn label(&self) -> &'static str {
        match self {
            Priority::NeedNow => "NEED_NOW",
            Priority::NeedSoon => "NEED_SOON",
            Priority::NeedLater => "NEED_LATER",
        }
    }

    /// Short badge text for tables
    pub fn badge(&self) -> &'static str {
        match self {
            Priority::NeedNow => "now",
            Priority::NeedSoon => "soon",
            Priority::NeedLater => "later",
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.urgency().cmp(&other.urgency())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "now" | "need_now" => Ok(Priority::NeedNow),
            "soon" | "need_soon" => Ok(Priority::NeedSoon),
            "later" | "need_later" => Ok(Priority::NeedLater),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// Maps a dependency depth to its tier
pub fn classify(depth: u32) -> Priority {
    Priority::classify(depth)
}

/// Merges the tiers of an item's sources into the most urgent one
///
/// Returns `None` when there are no tiers to merge.
pub fn merge_sources(tiers: impl IntoIterator<Item = Priority>) -> Option<Priority> {
    tiers.into_iter().max()
}
