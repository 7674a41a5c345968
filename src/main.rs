//! stash - prioritized shopping list for quest and hideout items

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = stash_planner::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
