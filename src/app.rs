// Declare modules
pub mod annotator;
pub mod cli;
pub mod config;
pub mod exiftool;
pub mod formatter;
pub mod models;
pub mod preview;
pub mod scanner;

use anyhow::{Context, Result};
use std::io;

use self::annotator::Annotator;
use self::cli::Cli;
use self::config::resolve_config;
use self::exiftool::ExifTool;
use self::formatter::OutputGenerator;
use self::preview::SystemPreviewer;
use self::scanner::Scanner;

/// Validates the setup, then hands every matched file to the annotator.
pub fn run(args: Cli) -> Result<()> {
    // 1. Resolve configuration (fails on a bad directory, field or type list)
    let config = resolve_config(args)?;
    log::debug!("Resolved configuration: {:?}", config);

    // 2. The metadata tool must exist before any file is touched
    let tool = ExifTool::new(&config.exiftool);
    let version = tool
        .check_available()
        .context("exiftool is required but could not be run")?;
    log::debug!("Using exiftool {}", version);

    // 3. Scan directory
    let scanner = Scanner::new(config.directory.clone(), &config.types)?;
    let entries = scanner.scan()?;

    if entries.is_empty() {
        println!(
            "No supported files found in '{}'.",
            config.directory.display()
        );
        return Ok(());
    }

    // 4. Annotate, one file at a time
    println!("{}", OutputGenerator::banner(&config));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = Annotator::new(&config, &tool, SystemPreviewer).run(
        &entries,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )?;

    // 5. Summary
    println!("\n{}", OutputGenerator::summary(&summary));

    Ok(())
}
