//! Quest and station progress commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{GraphNode, HideoutKey, PrerequisiteGraph, QuestId};
use crate::engine::{classify, Snapshot};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum QuestCommands {
    /// Mark a quest as completed
    Done {
        /// Quest ID
        id: String,
    },

    /// Mark a completed quest as not done
    Reopen {
        /// Quest ID
        id: String,
    },

    /// Show a quest with its depth, prerequisites and items
    Show {
        /// Quest ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum StationCommands {
    /// Mark a station level as built
    Done {
        /// Station level, e.g. workbench:2
        key: String,
    },

    /// Mark a built station level as not built
    Reopen {
        /// Station level, e.g. workbench:2
        key: String,
    },

    /// Show a station level with its depth, prerequisites and items
    Show {
        /// Station level, e.g. workbench:2
        key: String,
    },
}

pub fn run_quest(cmd: QuestCommands, output: &Output) -> Result<()> {
    match cmd {
        QuestCommands::Done { id } => set_quest(output, &id, true),
        QuestCommands::Reopen { id } => set_quest(output, &id, false),
        QuestCommands::Show { id } => show_quest(output, &id),
    }
}

pub fn run_station(cmd: StationCommands, output: &Output) -> Result<()> {
    match cmd {
        StationCommands::Done { key } => set_station(output, &key, true),
        StationCommands::Reopen { key } => set_station(output, &key, false),
        StationCommands::Show { key } => show_station(output, &key),
    }
}

fn set_quest(output: &Output, id_str: &str, completed: bool) -> Result<()> {
    let project = Project::open_current()?;
    let id: QuestId = id_str.parse()?;

    let store = project.progress_store();
    let mut planner = project.planner()?;

    // Catalog-level completion is not ours to undo
    if !completed && planner.quests().is_complete(&id) && !store.read()?.is_quest_done(&id) {
        anyhow::bail!(
            "Quest {} is marked completed in quests.jsonl; edit the catalog to reopen it",
            id
        );
    }

    let snapshot = planner.set_quest_completed(&id, completed)?;
    let changed = store.update(|progress| progress.mark_quest(&id, completed))?;
    output.verbose_ctx(
        "quest",
        &format!("Progress changed: {}, generation {}", changed, planner.generation()),
    );

    let name = planner
        .quests()
        .lookup(&id)
        .map(|q| q.display_name())
        .unwrap_or_else(|| id.to_string());
    report_change(output, "quest", &id.to_string(), &name, completed, changed, &snapshot);

    Ok(())
}

fn set_station(output: &Output, key_str: &str, completed: bool) -> Result<()> {
    let project = Project::open_current()?;
    let key: HideoutKey = key_str.parse()?;

    let store = project.progress_store();
    let mut planner = project.planner()?;

    if !completed && planner.hideout().is_complete(&key) && !store.read()?.is_station_done(&key) {
        anyhow::bail!(
            "Station level {} is marked completed in hideout.jsonl; edit the catalog to reopen it",
            key
        );
    }

    let snapshot = planner.set_station_completed(&key, completed)?;
    let changed = store.update(|progress| progress.mark_station(&key, completed))?;
    output.verbose_ctx(
        "station",
        &format!("Progress changed: {}, generation {}", changed, planner.generation()),
    );

    let name = planner
        .hideout()
        .lookup(&key)
        .map(|s| s.display_name())
        .unwrap_or_else(|| key.to_string());
    report_change(output, "station", &key.to_string(), &name, completed, changed, &snapshot);

    Ok(())
}

fn report_change(
    output: &Output,
    kind: &str,
    id: &str,
    name: &str,
    completed: bool,
    changed: bool,
    snapshot: &Snapshot,
) {
    let summary = snapshot.aggregation().summary();

    if output.is_json() {
        output.data(&serde_json::json!({
            "kind": kind,
            "id": id,
            "completed": completed,
            "changed": changed,
            "generation": snapshot.generation(),
            "summary": summary,
        }));
        return;
    }

    let verb = match (completed, changed) {
        (true, true) => "Completed",
        (false, true) => "Reopened",
        (true, false) => "Already completed",
        (false, false) => "Already open",
    };
    output.success(&format!("{} {}: {} ({})", verb, kind, name, id));
    println!(
        "Now needed: {} now, {} soon, {} later",
        summary.need_now, summary.need_soon, summary.need_later
    );
}

/// Prerequisite keys with their state: done, open or unknown
fn prerequisite_states<N: GraphNode>(
    graph: &PrerequisiteGraph<N>,
    key: &N::Key,
) -> Vec<(String, &'static str)> {
    graph
        .prerequisites_of(key)
        .iter()
        .map(|p| {
            let state = match graph.lookup(p) {
                Some(node) if node.is_completed() => "done",
                Some(_) => "open",
                None => "unknown",
            };
            (p.to_string(), state)
        })
        .collect()
}

fn status_label(completed: bool) -> &'static str {
    if completed {
        "done"
    } else {
        "open"
    }
}

fn show_quest(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: QuestId = id_str.parse()?;
    let planner = project.planner()?;

    let quest = planner
        .quests()
        .lookup(&id)
        .ok_or_else(|| anyhow::anyhow!("Quest not found: {}", id))?;
    let depth = planner.quest_depth(&id)?;
    let prerequisites = prerequisite_states(planner.quests(), &id);
    let unlocks = planner.quests().dependents(&id);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": quest.id,
            "name": quest.name,
            "completed": quest.completed,
            "min_level": quest.min_level,
            "depth": depth,
            "priority": classify(depth),
            "prerequisites": prerequisites
                .iter()
                .map(|(id, state)| serde_json::json!({ "id": id, "state": state }))
                .collect::<Vec<_>>(),
            "unlocks": unlocks,
            "items": quest.items,
        }));
        return Ok(());
    }

    println!("Quest: {} ({})", quest.name, quest.id);
    println!("Status: {}", status_label(quest.completed));
    println!("Depth: {} ({})", depth, classify(depth));
    if quest.min_level > 0 {
        println!("Min level: {}", quest.min_level);
    }

    print_prerequisites(&prerequisites);
    print_unlocks(&unlocks);

    if !quest.items.is_empty() {
        println!("\nItems:");
        for line in &quest.items {
            println!(
                "  {} x{}{}",
                line.item,
                line.quantity,
                if line.found_in_raid { " FIR" } else { "" }
            );
        }
    }

    Ok(())
}

fn show_station(output: &Output, key_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let key: HideoutKey = key_str.parse()?;
    let planner = project.planner()?;

    let station = planner
        .hideout()
        .lookup(&key)
        .ok_or_else(|| anyhow::anyhow!("Station level not found: {}", key))?;
    let depth = planner.station_depth(&key)?;
    let prerequisites = prerequisite_states(planner.hideout(), &key);
    let unlocks = planner.hideout().dependents(&key);

    if output.is_json() {
        output.data(&serde_json::json!({
            "key": station.key,
            "station_name": station.station_name,
            "level": station.key.level(),
            "completed": station.completed,
            "depth": depth,
            "priority": classify(depth),
            "prerequisites": prerequisites
                .iter()
                .map(|(key, state)| serde_json::json!({ "key": key, "state": state }))
                .collect::<Vec<_>>(),
            "unlocks": unlocks,
            "items": station.items,
        }));
        return Ok(());
    }

    println!("Station: {} ({})", station.display_name(), station.key);
    println!("Status: {}", status_label(station.completed));
    println!("Depth: {} ({})", depth, classify(depth));

    print_prerequisites(&prerequisites);
    print_unlocks(&unlocks);

    if !station.items.is_empty() {
        println!("\nItems:");
        for line in &station.items {
            println!("  {} x{}", line.item, line.quantity);
        }
    }

    Ok(())
}

fn print_prerequisites(prerequisites: &[(String, &'static str)]) {
    if prerequisites.is_empty() {
        return;
    }
    println!("\nPrerequisites:");
    for (key, state) in prerequisites {
        println!("  {} ({})", key, state);
    }
}

fn print_unlocks<K: std::fmt::Display>(unlocks: &[K]) {
    if unlocks.is_empty() {
        return;
    }
    println!("\nUnlocks:");
    for key in unlocks {
        println!("  {}", key);
    }
}
