//! Identifiers for quests, hideout station levels and items
//!
//! ID Format:
//! - Quest IDs: opaque upstream strings (e.g., `5936d90786f7742b1420ba5b`)
//! - Station IDs: opaque strings without `:` (e.g., `workbench`)
//! - Hideout keys: `{station}:{level}` (e.g., `workbench:2`), level >= 1
//! - Item IDs: opaque upstream strings
//!
//! All IDs are trimmed on parse and serialize as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Quest ID must not be empty")]
    EmptyQuestId,

    #[error("Item ID must not be empty")]
    EmptyItemId,

    #[error("Invalid station ID: expected a non-empty name without ':', got '{0}'")]
    InvalidStationId(String),

    #[error("Invalid hideout key format: expected '{{station}}:{{level}}', got '{0}'")]
    InvalidHideoutKey(String),

    #[error("Invalid station level: {0} (levels start at 1)")]
    InvalidLevel(String),
}

/// Quest identifier as delivered by the quest catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestId(String);

impl QuestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for QuestId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::EmptyQuestId);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for QuestId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuestId> for String {
    fn from(id: QuestId) -> Self {
        id.0
    }
}

/// Item identifier; never validated against a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::EmptyItemId);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ItemId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Hideout station identifier (one station has several levels)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.contains(':') {
            return Err(IdError::InvalidStationId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for StationId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

/// Composite key of one upgrade level of one station: `{station}:{level}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HideoutKey {
    station: StationId,
    level: u32,
}

impl HideoutKey {
    pub fn new(station: StationId, level: u32) -> Result<Self, IdError> {
        if level == 0 {
            return Err(IdError::InvalidLevel(level.to_string()));
        }
        Ok(Self { station, level })
    }

    pub fn station(&self) -> &StationId {
        &self.station
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the key of the previous level of the same station, if any
    pub fn previous(&self) -> Option<HideoutKey> {
        (self.level > 1).then(|| HideoutKey {
            station: self.station.clone(),
            level: self.level - 1,
        })
    }
}

impl fmt::Display for HideoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.station, self.level)
    }
}

impl FromStr for HideoutKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (station, level) = s
            .rsplit_once(':')
            .ok_or_else(|| IdError::InvalidHideoutKey(s.to_string()))?;

        let station: StationId = station
            .parse()
            .map_err(|_| IdError::InvalidHideoutKey(s.to_string()))?;
        let level: u32 = level
            .parse()
            .map_err(|_| IdError::InvalidLevel(level.to_string()))?;

        Self::new(station, level)
    }
}

impl TryFrom<String> for HideoutKey {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HideoutKey> for String {
    fn from(key: HideoutKey) -> Self {
        key.to_string()
    }
}
