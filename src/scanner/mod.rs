// src/scanner/mod.rs
// =============================================================================
// This module contains the matching side of the pipeline.
//
// Submodules:
// - patterns: The fixed catalog of image/link/URL expressions
// - lines: Runs one catalog entry over one file, line by line
//
// This file ties them together and runs the per-file scans concurrently.
// Each file is scanned on tokio's blocking thread pool (file reads are
// blocking I/O); `buffered` keeps the results in the order the files were
// given, so the report is identical to a sequential run.
// =============================================================================

mod lines;
mod patterns;

pub use lines::{scan_file, FileReport, MatchRecord};
pub use patterns::{CatalogOptions, Category, HrefPolicy, PatternCatalog};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;

/// Scans every file with every active catalog entry.
///
/// At most `jobs` files are read at the same time. The returned reports
/// are in the same order as `files`.
pub async fn scan_files(
    files: Vec<PathBuf>,
    catalog: Arc<PatternCatalog>,
    jobs: usize,
) -> Result<Vec<FileReport>> {
    let tasks = files.into_iter().map(|path| {
        let catalog = Arc::clone(&catalog);
        tokio::task::spawn_blocking(move || scan_file(&path, &catalog))
    });

    let joined: Vec<_> = stream::iter(tasks).buffered(jobs.max(1)).collect().await;

    joined
        .into_iter()
        .map(|result| result.context("file scan task panicked"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_concurrent_scan_matches_sequential_order() {
        let dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..12 {
            let path = dir.path().join(format!("doc{i:02}.md"));
            fs::write(&path, format!("[link{i}](page{i}.md)\n")).unwrap();
            files.push(path);
        }
        let catalog = Arc::new(PatternCatalog::new(CatalogOptions::default()).unwrap());

        let sequential: Vec<_> = files.iter().map(|f| scan_file(f, &catalog)).collect();
        let concurrent = scan_files(files.clone(), Arc::clone(&catalog), 4).await.unwrap();

        assert_eq!(concurrent.len(), files.len());
        for (a, b) in sequential.iter().zip(&concurrent) {
            assert_eq!(a.file, b.file);
            assert_eq!(a.matches, b.matches);
        }
    }

    #[tokio::test]
    async fn test_zero_jobs_still_runs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "<https://example.org>\n").unwrap();
        let catalog = Arc::new(PatternCatalog::new(CatalogOptions::default()).unwrap());

        let reports = scan_files(vec![path], catalog, 0).await.unwrap();
        assert_eq!(reports[0].matches.len(), 1);
        assert_eq!(reports[0].matches[0].category, Category::Url);
    }
}
