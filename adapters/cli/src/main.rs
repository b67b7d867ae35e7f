#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that evaluates a scan decision tree scenario.

mod report;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scan_tree_system_analysis::augment_and_analyze;
use scan_tree_system_movement::PathSimulator;
use tracing_subscriber::EnvFilter;

/// Normalizes, augments and analyzes the decision tree in a scenario file.
#[derive(Debug, Parser)]
#[command(name = "scan-tree", version, long_about = None)]
struct Cli {
    /// Scenario file (TOML) holding the clue and the decision tree.
    scenario: PathBuf,
    /// Output format of the report.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Assume the meerkats familiar is active regardless of the scenario.
    #[arg(long)]
    meerkats: bool,
    /// Log engine decisions to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Entry point for the scan tree command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut scenario = scenario::load(&cli.scenario)?;
    if cli.meerkats {
        scenario.tree.assumes_meerkats = true;
    }
    let simulator = PathSimulator::new(scenario.movement.config());
    tracing::debug!(scenario = %cli.scenario.display(), "evaluating scan tree");

    let view = augment_and_analyze(&mut scenario.tree, &simulator);
    let output = match cli.format {
        Format::Text => report::render_text(&view),
        Format::Json => serde_json::to_string_pretty(&report::Report::new(&view))
            .context("failed to serialize report")?,
    };
    println!("{output}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
