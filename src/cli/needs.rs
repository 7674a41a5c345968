//! Shopping list commands (needs, item)

use anyhow::Result;
use clap::Args;

use super::output::Output;
use crate::domain::{DataWarning, ItemId};
use crate::engine::{AggregateOptions, AggregatedItem, Priority};
use crate::storage::{ItemIndex, Project};

#[derive(Args, Debug)]
pub struct NeedsArgs {
    /// Include completed quests and built station levels
    #[arg(long)]
    pub all: bool,

    /// Include items still listed on completed quests
    #[arg(long)]
    pub include_completed_quests: bool,

    /// Include items still listed on built station levels
    #[arg(long)]
    pub include_completed_hideout: bool,

    /// Only show one tier (now, soon, later)
    #[arg(long, short)]
    pub priority: Option<Priority>,
}

impl NeedsArgs {
    /// Flags widen the configured view, never narrow it
    fn options(&self, configured: AggregateOptions) -> AggregateOptions {
        if self.all {
            return AggregateOptions::all();
        }
        AggregateOptions {
            include_completed_quests: configured.include_completed_quests
                || self.include_completed_quests,
            include_completed_hideout: configured.include_completed_hideout
                || self.include_completed_hideout,
        }
    }
}

/// JSON shape of one aggregated item
pub(super) fn item_json(item: &AggregatedItem, names: &ItemIndex) -> serde_json::Value {
    serde_json::json!({
        "item": item.item,
        "name": names.display_name(&item.item),
        "total_quantity": item.total_quantity,
        "found_in_raid": item.found_in_raid,
        "priority": item.priority,
        "sources": item.sources,
    })
}

pub(super) fn report_warnings(output: &Output, warnings: &[DataWarning]) {
    for warning in warnings {
        output.warning(&warning.to_string());
    }
}

fn sources_text(item: &AggregatedItem) -> String {
    item.sources
        .iter()
        .map(|s| format!("{} x{}", s.display_name, s.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Show the prioritized shopping list
pub fn needs(output: &Output, args: &NeedsArgs) -> Result<()> {
    let project = Project::open_current()?;
    output.verbose_ctx(
        "needs",
        &format!("Opened project at: {}", project.root().display()),
    );

    let mut planner = project.planner()?;
    let options = args.options(planner.options());
    output.verbose_ctx("needs", &format!("View options: {:?}", options));

    let snapshot = planner.set_options(options);
    let aggregation = snapshot.aggregation();
    let names = project.items()?;

    report_warnings(output, aggregation.warnings());

    let items = match args.priority {
        Some(priority) => aggregation.with_priority(priority),
        None => aggregation.by_priority(),
    };

    output.verbose_ctx("needs", &format!("Showing {} of {} items", items.len(), aggregation.len()));

    if output.is_json() {
        let list: Vec<_> = items.iter().map(|item| item_json(item, &names)).collect();
        output.data(&list);
    } else if items.is_empty() {
        println!("Nothing to collect.");
    } else {
        println!("{:<11} {:<32} {:>5} {:<4} SOURCES", "PRIORITY", "ITEM", "QTY", "FIR");
        println!("{}", "-".repeat(80));
        for item in &items {
            println!(
                "{:<11} {:<32} {:>5} {:<4} {}",
                item.priority.label(),
                names.display_name(&item.item),
                item.total_quantity,
                if item.found_in_raid { "yes" } else { "" },
                sources_text(item)
            );
        }

        let summary = aggregation.summary();
        println!();
        println!(
            "{} items: {} now, {} soon, {} later",
            summary.total(),
            summary.need_now,
            summary.need_soon,
            summary.need_later
        );
    }

    Ok(())
}

/// Show one item with every source's depth and tier
pub fn item(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: ItemId = id_str.parse()?;

    let snapshot = project.planner()?.recalculate();
    let names = project.items()?;

    let item = snapshot
        .aggregation()
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("No open requirements for item: {}", id))?;

    if output.is_json() {
        output.data(&item_json(item, &names));
        return Ok(());
    }

    println!("Item: {} ({})", names.display_name(&item.item), item.item);
    if let Some(short) = names.get(&item.item).and_then(|info| info.short_name.as_deref()) {
        println!("Short name: {}", short);
    }
    println!("Priority: {}", item.priority);
    println!(
        "Total: {}{}",
        item.total_quantity,
        if item.found_in_raid { " (found in raid)" } else { "" }
    );

    println!("\nNeeded by:");
    for source in &item.sources {
        println!(
            "  {:<11} depth {:<3} {:<28} x{}{}",
            source.priority.label(),
            source.depth,
            format!("{} [{}]", source.display_name, source.source),
            source.quantity,
            if source.found_in_raid { " FIR" } else { "" }
        );
    }

    Ok(())
}
