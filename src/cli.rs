// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes. Everything here is raw user input; it is
// turned into a validated ScanConfig in config.rs.
// =============================================================================

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "md-link-scan",
    version,
    about = "Lists the images, links and URLs in Markdown files",
    long_about = "md-link-scan finds every .md file under the given paths and reports each \
                  image, link and URL (Markdown or HTML syntax) with its file, line and column. \
                  It is meant for auditing documentation repositories."
)]
pub struct Cli {
    /// Markdown files or directories to scan (default: current directory)
    pub paths: Vec<String>,

    /// Only report HTML href attributes whose value starts with http:// or https://
    #[arg(long)]
    pub strict_urls: bool,

    /// Also report Markdown links whose target is only a fragment, e.g. [top](#top)
    #[arg(long)]
    pub include_fragments: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long)]
    pub json: bool,

    /// How many files to scan at the same time
    #[arg(short, long, default_value_t = 4)]
    pub jobs: usize,

    /// Print debug logs to stderr (RUST_LOG overrides this)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// File list, grouped matches and a summary
    Text,
    /// One line per match, nothing else (greppable)
    Plain,
    /// A single JSON document
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["md-link-scan"]).unwrap();
        assert!(cli.paths.is_empty());
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.jobs, 4);
        assert!(!cli.strict_urls && !cli.include_fragments && !cli.json);
    }

    #[test]
    fn test_paths_and_flags() {
        let cli = Cli::try_parse_from([
            "md-link-scan",
            "docs",
            "README.md",
            "--strict-urls",
            "--format",
            "plain",
            "-j",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.paths, vec!["docs", "README.md"]);
        assert!(cli.strict_urls);
        assert_eq!(cli.format, OutputFormat::Plain);
        assert_eq!(cli.jobs, 1);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
