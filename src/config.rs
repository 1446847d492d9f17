// src/config.rs
// =============================================================================
// The validated, immutable configuration of one run.
//
// Built once from the parsed CLI and passed down explicitly; nothing reads
// the command line or global state after this point.
// =============================================================================

use crate::cli::{Cli, OutputFormat};
use crate::scanner::{CatalogOptions, HrefPolicy};

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Raw path arguments; empty means the current directory
    pub paths: Vec<String>,
    pub catalog: CatalogOptions,
    pub format: OutputFormat,
    /// Concurrent file scans, at least 1
    pub jobs: usize,
}

impl ScanConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let href_policy = if cli.strict_urls {
            HrefPolicy::StrictUrl
        } else {
            HrefPolicy::AnyValue
        };

        let format = if cli.json { OutputFormat::Json } else { cli.format };

        Self {
            paths: cli.paths.clone(),
            catalog: CatalogOptions {
                href_policy,
                include_fragments: cli.include_fragments,
            },
            format,
            jobs: cli.jobs.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_json_flag_wins_over_format() {
        let cli = Cli::try_parse_from(["md-link-scan", "--format", "plain", "--json"]).unwrap();
        assert_eq!(ScanConfig::from_cli(&cli).format, OutputFormat::Json);
    }

    #[test]
    fn test_policy_and_jobs() {
        let cli = Cli::try_parse_from(["md-link-scan", "--strict-urls", "--jobs", "0"]).unwrap();
        let config = ScanConfig::from_cli(&cli);
        assert_eq!(config.catalog.href_policy, HrefPolicy::StrictUrl);
        assert!(!config.catalog.include_fragments);
        assert_eq!(config.jobs, 1);
    }
}
