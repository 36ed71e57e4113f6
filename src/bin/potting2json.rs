//! Convert a potting archive into a flat JSON list of modules

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::Level;

use potlog::batch::{process_potting_logs, write_json};
use potlog::settings::Settings;

#[derive(Parser)]
#[command(name = "potting2json")]
#[command(about = "Convert a potting log archive to json")]
#[command(version)]
struct Cli {
    /// Zipfile containing Config-*.zip potting archives
    archive: Option<PathBuf>,

    /// Output file (default: Potting_Logs.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(archive) = cli.archive else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

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

    let modules = process_potting_logs(&archive, &settings)
        .with_context(|| format!("Failed to process potting logs from {:?}", archive))?;
    write_json(&settings.output_file, &modules)
        .with_context(|| format!("Failed to write {:?}", settings.output_file))?;

    Ok(())
}
