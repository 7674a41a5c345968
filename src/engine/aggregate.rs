//! Item requirement aggregation
//!
//! Collapses every item line of every in-scope quest and station level into
//! one [`AggregatedItem`] per item id, then attaches a depth and tier to each
//! source and merges the tiers per item.
//!
//! One call of [`aggregate`] is one calculation pass: it builds fresh depth
//! calculators for both graphs, shares them across every source of the pass
//! and drops them on return.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::{
    DataWarning, GraphNode, HideoutGraph, HideoutNode, ItemId, QuestGraph, QuestNode, SourceRef,
};

use super::depth::DepthCalculator;
use super::priority::{classify, merge_sources, Priority};

/// Which completed nodes still count
///
/// The default (both false) is the active view: only what is still to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    pub include_completed_quests: bool,
    pub include_completed_hideout: bool,
}

impl AggregateOptions {
    /// Only incomplete quests and station levels
    pub fn active() -> Self {
        Self::default()
    }

    /// Everything, completed or not
    pub fn all() -> Self {
        Self {
            include_completed_quests: true,
            include_completed_hideout: true,
        }
    }
}

/// One raw requirement line, as read from a node
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRequirementEdge {
    pub item: String,
    pub source: SourceRef,
    pub display_name: String,
    pub quantity: i64,
    pub found_in_raid: bool,
}

/// One originating node of an aggregated item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSource {
    pub source: SourceRef,
    pub display_name: String,

    /// Sum of every line this node contributes for the item
    pub quantity: u64,
    pub found_in_raid: bool,

    /// Dependency depth of the node in its own graph
    pub depth: u32,
    pub priority: Priority,
}

/// Everything needed of one item across both graphs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedItem {
    pub item: ItemId,
    pub total_quantity: u64,

    /// True if any source needs the item found in raid
    pub found_in_raid: bool,

    /// Most urgent tier across sources
    pub priority: Priority,

    /// One entry per originating node, in first-seen order
    pub sources: Vec<ItemSource>,
}

impl AggregatedItem {
    fn new(item: ItemId) -> Self {
        Self {
            item,
            total_quantity: 0,
            found_in_raid: false,
            priority: Priority::NeedLater,
            sources: Vec::new(),
        }
    }

    /// Returns the source entry for a node, if it contributes
    pub fn source(&self, source: &SourceRef) -> Option<&ItemSource> {
        self.sources.iter().find(|s| &s.source == source)
    }

    /// Smallest depth among sources
    pub fn min_depth(&self) -> u32 {
        self.sources.iter().map(|s| s.depth).min().unwrap_or(0)
    }
}

/// Item counts per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrioritySummary {
    pub need_now: usize,
    pub need_soon: usize,
    pub need_later: usize,
}

impl PrioritySummary {
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::NeedNow => self.need_now,
            Priority::NeedSoon => self.need_soon,
            Priority::NeedLater => self.need_later,
        }
    }

    pub fn total(&self) -> usize {
        self.need_now + self.need_soon + self.need_later
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    items: BTreeMap<ItemId, AggregatedItem>,
    warnings: Vec<DataWarning>,
}

impl Aggregation {
    /// Items ordered by item id
    pub fn items(&self) -> impl Iterator<Item = &AggregatedItem> {
        self.items.values()
    }

    pub fn get(&self, item: &ItemId) -> Option<&AggregatedItem> {
        self.items.get(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Data-quality warnings raised during the pass
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    /// Items most urgent first, then by smallest depth, then by id
    pub fn by_priority(&self) -> Vec<&AggregatedItem> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.min_depth().cmp(&b.min_depth()))
                .then_with(|| a.item.cmp(&b.item))
        });
        items
    }

    /// Items of one tier, in [`by_priority`](Self::by_priority) order
    pub fn with_priority(&self, priority: Priority) -> Vec<&AggregatedItem> {
        let mut items = self.by_priority();
        items.retain(|i| i.priority == priority);
        items
    }

    pub fn summary(&self) -> PrioritySummary {
        let mut summary = PrioritySummary::default();
        for item in self.items.values() {
            match item.priority {
                Priority::NeedNow => summary.need_now += 1,
                Priority::NeedSoon => summary.need_soon += 1,
                Priority::NeedLater => summary.need_later += 1,
            }
        }
        summary
    }
}

/// Depth calculators of one pass, one per graph
struct Pass<'g> {
    quests: DepthCalculator<'g, QuestNode>,
    hideout: DepthCalculator<'g, HideoutNode>,
}

impl<'g> Pass<'g> {
    fn new(quests: &'g QuestGraph, hideout: &'g HideoutGraph) -> Self {
        Self {
            quests: DepthCalculator::new(quests),
            hideout: DepthCalculator::new(hideout),
        }
    }

    fn depth(&mut self, source: &SourceRef) -> u32 {
        match source {
            SourceRef::Quest(id) => self.quests.depth_of_member(id),
            SourceRef::Hideout(key) => self.hideout.depth_of_member(key),
        }
    }
}

/// Extracts the requirement lines of every in-scope node
///
/// Quests come first, then station levels, each in graph order.
pub fn requirement_edges(
    quests: &QuestGraph,
    hideout: &HideoutGraph,
    options: AggregateOptions,
) -> Vec<ItemRequirementEdge> {
    let mut edges = Vec::new();

    for quest in quests.nodes() {
        if quest.completed && !options.include_completed_quests {
            continue;
        }
        for line in &quest.items {
            edges.push(ItemRequirementEdge {
                item: line.item.clone(),
                source: SourceRef::Quest(quest.id.clone()),
                display_name: quest.name.clone(),
                quantity: line.quantity,
                found_in_raid: line.found_in_raid,
            });
        }
    }

    for station in hideout.nodes() {
        if station.completed && !options.include_completed_hideout {
            continue;
        }
        let display_name = station.display_name();
        for line in &station.items {
            edges.push(ItemRequirementEdge {
                item: line.item.clone(),
                source: SourceRef::Hideout(station.key.clone()),
                display_name: display_name.clone(),
                quantity: line.quantity,
                found_in_raid: false,
            });
        }
    }

    edges
}

fn validate(edge: &ItemRequirementEdge) -> Result<(ItemId, u64), DataWarning> {
    let invalid = |reason: String| DataWarning::InvalidRequirement {
        origin: edge.source.to_string(),
        item: edge.item.clone(),
        reason,
    };

    let item: ItemId = edge
        .item
        .parse()
        .map_err(|_| invalid("empty item id".to_string()))?;

    if edge.quantity <= 0 {
        return Err(invalid(format!("non-positive quantity {}", edge.quantity)));
    }

    Ok((item, edge.quantity as u64))
}

/// Runs one full aggregation pass over both graphs
pub fn aggregate(
    quests: &QuestGraph,
    hideout: &HideoutGraph,
    options: AggregateOptions,
) -> Aggregation {
    let edges = requirement_edges(quests, hideout, options);
    let edge_count = edges.len();

    let mut pass = Pass::new(quests, hideout);
    let mut items: BTreeMap<ItemId, AggregatedItem> = BTreeMap::new();
    let mut warnings = Vec::new();

    for edge in edges {
        let (item_id, quantity) = match validate(&edge) {
            Ok(valid) => valid,
            Err(warning) => {
                warn!(code = warning.code(), "{}", warning);
                warnings.push(warning);
                continue;
            }
        };

        let item = items
            .entry(item_id.clone())
            .or_insert_with(|| AggregatedItem::new(item_id));

        // A source's quantity never exceeds the item total, so one check covers both sums
        let Some(total) = item.total_quantity.checked_add(quantity) else {
            let warning = DataWarning::InvalidRequirement {
                origin: edge.source.to_string(),
                item: edge.item,
                reason: "quantity overflow".to_string(),
            };
            warn!(code = warning.code(), "{}", warning);
            warnings.push(warning);
            continue;
        };
        item.total_quantity = total;
        item.found_in_raid |= edge.found_in_raid;

        // Several lines of one node fold into that node's single entry
        if let Some(existing) = item.sources.iter_mut().find(|s| s.source == edge.source) {
            existing.quantity += quantity;
            existing.found_in_raid |= edge.found_in_raid;
            continue;
        }

        let depth = pass.depth(&edge.source);
        item.sources.push(ItemSource {
            source: edge.source,
            display_name: edge.display_name,
            quantity,
            found_in_raid: edge.found_in_raid,
            depth,
            priority: classify(depth),
        });
    }

    for item in items.values_mut() {
        if let Some(priority) = merge_sources(item.sources.iter().map(|s| s.priority)) {
            item.priority = priority;
        }
    }

    debug!(
        edges = edge_count,
        items = items.len(),
        quest_depths = pass.quests.memoized(),
        station_depths = pass.hideout.memoized(),
        "aggregation pass complete"
    );

    for warning in pass
        .quests
        .into_warnings()
        .into_iter()
        .chain(pass.hideout.into_warnings())
    {
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    }

    Aggregation { items, warnings }
}
