//! potlog - Combine potting and gluing logs into one JSON document
//!
//! Reads a potting archive (zip of `Config-*.zip` files) and/or a gluing
//! archive (zip of text logs) and writes a mapping from module id to its
//! potting and gluing records.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use potlog::batch::{combine, process_gluing_logs, process_potting_logs, write_json};
use potlog::lookup::{HdiLookup, ModuleIdResolver, NoLookup};
use potlog::settings::Settings;

#[derive(Parser)]
#[command(name = "potlog")]
#[command(about = "Convert manufacturing log files to json")]
#[command(version)]
struct Cli {
    /// Zipfile containing Potting log files
    #[arg(long)]
    pottinglog: Option<PathBuf>,

    /// Zipfile containing Gluing log files
    #[arg(long)]
    gluinglog: Option<PathBuf>,

    /// Output file (default: Potting_Logs.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,

    /// Do not resolve module ids over the network
    #[arg(long)]
    no_lookup: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut settings = Settings::load_with(cli.config.as_deref());
    if let Some(output) = cli.output {
        settings.output_file = output;
    }
    if cli.save_config {
        settings
            .save_with(cli.config.as_deref())
            .map_err(anyhow::Error::msg)
            .context("Failed to save settings")?;
    }

    if cli.pottinglog.is_none() && cli.gluinglog.is_none() {
        tracing::warn!("Neither --pottinglog nor --gluinglog given, output will be empty");
    }

    let potting = match &cli.pottinglog {
        Some(path) => process_potting_logs(path, &settings)
            .with_context(|| format!("Failed to process potting logs from {:?}", path))?,
        None => Vec::new(),
    };

    let gluing = match &cli.gluinglog {
        Some(path) => {
            let http = HdiLookup::new(&settings.lookup_url);
            let resolver: &dyn ModuleIdResolver = if cli.no_lookup { &NoLookup } else { &http };
            process_gluing_logs(path, &settings, resolver)
                .with_context(|| format!("Failed to process gluing logs from {:?}", path))?
        }
        None => Vec::new(),
    };

    let logs = combine(potting, gluing);
    write_json(&settings.output_file, &logs)
        .with_context(|| format!("Failed to write {:?}", settings.output_file))?;

    Ok(())
}
