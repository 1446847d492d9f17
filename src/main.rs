// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Resolve the path arguments into a set of Markdown files
// 3. Scan every file with every active pattern of the catalog
// 4. Print the report to stdout and the diagnostics to stderr
// 5. Exit with the proper code (0 = success, 255 = a path or file failed,
//    2 = unexpected error)
//
// Rust concepts used:
// - async/await: file scans run on tokio's blocking pool concurrently
// - Arc: lets every scan task share the one compiled pattern catalog
// - Result<T, E> with `?`: unexpected errors bubble up to main()
// =============================================================================

// Module declarations - tells Rust about our other source files

mod cli;
mod config;
mod discover;
mod error;
mod logging;
mod report;
mod scanner;
mod status;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};

use cli::Cli;
use config::ScanConfig;
use scanner::PatternCatalog;

// The #[tokio::main] attribute creates a tokio runtime and runs our async
// main inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0)   = every path was valid and every file was scanned
//   Ok(255) = some path, directory or file failed (the rest was still done)
//   Err     = unexpected error (main turns it into exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments; handles --help and --version too
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    // Freeze the configuration; nothing reads the CLI after this
    let config = ScanConfig::from_cli(&cli);
    debug!(?config, "configuration");

    // Compile the pattern table once and share it with every scan task
    let catalog = Arc::new(
        PatternCatalog::new(config.catalog).context("failed to build the pattern catalog")?,
    );
    debug!(
        entries = catalog.all().len(),
        active = catalog.active().count(),
        "pattern catalog ready"
    );

    // Turn the path arguments into a deduplicated set of Markdown files.
    // Bad arguments don't stop us; they only downgrade the status.
    let resolution = discover::resolve(&config.paths);
    let mut status = resolution.status;

    // Scan tasks log to stderr too, so the lock is only held while writing
    {
        let mut err = std::io::stderr().lock();
        for diagnostic in &resolution.diagnostics {
            report::write_diagnostic(&mut err, diagnostic)?;
        }
    }

    if resolution.files.is_empty() {
        info!("no markdown files to scan");
    }
    info!(files = resolution.files.len(), "scanning");

    // Scan all files; reports come back in the same (sorted) order
    let reports =
        scanner::scan_files(resolution.files.into_vec(), Arc::clone(&catalog), config.jobs)
            .await?;

    // A file that became unreadable counts as a failure too
    {
        let mut err = std::io::stderr().lock();
        for file_report in &reports {
            if let Some(scan_error) = &file_report.error {
                status.downgrade();
                report::write_scan_error(&mut err, scan_error)?;
            }
        }
    }

    // Finally print the report in the chosen format
    let mut out = std::io::stdout().lock();
    report::write_report(&mut out, config.format, &reports, status)
        .context("failed to write the report")?;

    Ok(status.exit_code())
}
