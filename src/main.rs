// Asset Sync
// Copies build resources into each build output directory after compilation

// MODULES ------------------>>

mod logging;

//--------------------------------------------------------<<
// IMPORTS ------------------>>

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;

use asset_sync::{AppConfig, ConsoleReporter, ManifestDriver, SyncOptions};

//--------------------------------------------------------<<

/// Copy a manifest of resource directories and files into build output directories
#[derive(Debug, Parser)]
#[command(name = "asset-sync", version, about)]
struct Cli {
    /// Overwrite existing destination entries (ignored with --sync)
    #[arg(long)]
    force: bool,

    /// Update changed files and remove orphans instead of copying once
    #[arg(long)]
    sync: bool,

    /// Load entries and targets from a YAML manifest instead of the built-in one
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Project root that sources and targets are resolved against [default: current directory]
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Target root to apply the manifest to; repeat to add more (replaces the manifest's targets)
    #[arg(long = "target", value_name = "DIR")]
    targets: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                 MAIN ENTRY POINT                                                 │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let source_root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let options = SyncOptions {
        sync: cli.sync,
        force: cli.force,
    };

    let config = AppConfig::load(cli.manifest.as_deref())?
        .with_options(options)
        .with_targets(cli.targets);

    tracing::debug!(
        root = %source_root.display(),
        entries = config.manifest.entries.len(),
        targets = config.manifest.targets.len(),
        "starting run"
    );

    let driver = ManifestDriver::new(&source_root, config);
    let mut reporter = ConsoleReporter::stdout(&source_root);

    driver.run(&mut reporter)?;

    Ok(())
}
