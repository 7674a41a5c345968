//! Main CLI application structure

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{needs, progress, query};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "stash")]
#[command(author, version, about = "Prioritized shopping list for quest and hideout items")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to `default_format` in the global config)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stash project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Show every item still needed, most urgent first
    Needs(needs::NeedsArgs),

    /// Show where one item is needed and how urgently
    Item {
        /// Item ID
        id: String,
    },

    /// Track quest completion
    #[command(subcommand)]
    Quest(progress::QuestCommands),

    /// Track hideout station levels
    #[command(subcommand)]
    Station(progress::StationCommands),

    /// Show project status overview
    Status,

    /// Report unreadable records, unknown references and prerequisite cycles
    Check,
}

/// Installs the stderr log subscriber
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => {
            Config::load_global()
                .context("Failed to load global config")?
                .default_format
        }
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("stash starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .stash directory at: {}", project.stash_dir().display()),
            );
            output.success(&format!(
                "Initialized stash project at {}",
                project.root().display()
            ));
        }

        Commands::Needs(args) => needs::needs(&output, &args)?,
        Commands::Item { id } => needs::item(&output, &id)?,

        Commands::Quest(cmd) => progress::run_quest(cmd, &output)?,
        Commands::Station(cmd) => progress::run_station(cmd, &output)?,

        Commands::Status => {
            output.verbose("Gathering project status");
            query::status(&output)?
        }
        Commands::Check => query::check(&output)?,
    }

    Ok(())
}
