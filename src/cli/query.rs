//! Query commands (status, check)

use anyhow::Result;

use super::needs::report_warnings;
use super::output::Output;
use crate::domain::DataWarning;
use crate::engine::{aggregate, AggregateOptions, Planner};
use crate::storage::Project;

/// Show project status overview
pub fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let planner = project.planner()?;
    let snapshot = planner.recalculate();

    let quests = planner.quests();
    let hideout = planner.hideout();
    let summary = snapshot.aggregation().summary();
    let warning_count = snapshot.aggregation().warnings().len();

    if output.is_json() {
        output.data(&serde_json::json!({
            "quests": {
                "total": quests.len(),
                "completed": quests.completed_count(),
            },
            "stations": {
                "total": hideout.len(),
                "completed": hideout.completed_count(),
            },
            "items": summary,
            "warnings": warning_count,
        }));
    } else {
        println!("Project: {}", project.root().display());
        println!();
        println!(
            "Quests:   {}/{} complete",
            quests.completed_count(),
            quests.len()
        );
        println!(
            "Stations: {}/{} built",
            hideout.completed_count(),
            hideout.len()
        );
        println!();
        println!("Items needed: {}", summary.total());
        println!("  Now:   {}", summary.need_now);
        println!("  Soon:  {}", summary.need_soon);
        println!("  Later: {}", summary.need_later);

        if warning_count > 0 {
            println!();
            println!(
                "{} data warning(s); run 'stash check' for details",
                warning_count
            );
        }
    }

    Ok(())
}

/// Every data-quality problem in the catalogs
///
/// Structural issues come from both graphs; invalid requirement lines are
/// collected by aggregating every node, completed or not.
fn issues(planner: &Planner) -> Vec<DataWarning> {
    let mut issues = planner.check();

    let full = aggregate(planner.quests(), planner.hideout(), AggregateOptions::all());
    issues.extend(
        full.warnings()
            .iter()
            .filter(|w| matches!(w, DataWarning::InvalidRequirement { .. }))
            .cloned(),
    );

    issues
}

/// Report unreadable or duplicate records, unknown references, cycles and
/// invalid requirement lines
///
/// Fails when any issue is found, so it can gate catalog updates.
pub fn check(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let planner = project.planner()?;
    let issues = issues(&planner);

    output.verbose_ctx("check", &format!("Found {} issue(s)", issues.len()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "ok": issues.is_empty(),
            "issues": issues,
        }));
    } else if issues.is_empty() {
        println!("No issues found.");
    } else {
        report_warnings(output, &issues);
    }

    if !issues.is_empty() {
        anyhow::bail!("{} data issue(s) found", issues.len());
    }

    Ok(())
}
