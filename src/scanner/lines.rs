// src/scanner/lines.rs
// =============================================================================
// This module runs one catalog entry over one file, line by line.
//
// There is a single generic `scan(file, pattern)` routine used for every
// entry of the catalog. It returns a lazy iterator: the file is read one
// line at a time through a BufReader and each line is searched for all
// non-overlapping matches, left to right.
//
// Positions:
// - line numbers start at 1 and increase per line read
// - columns start at 1 and count characters (Unicode scalar values), not
//   bytes, so a match after "héllo " is reported at column 7
// - the column points at the first character of the construct itself
//   (the `[` of a link), never at a guard character
// =============================================================================

use serde::Serialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use super::patterns::{Category, Dialect, PatternCatalog, PatternSpec};
use crate::error::ScanError;

/// One reported occurrence of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub category: Category,
    pub dialect: Dialect,
    pub pattern: &'static str,
    pub glyph: &'static str,
    pub text: String,
}

/// Everything found in one file across the active catalog entries.
///
/// Matches are grouped by catalog order, then by position in the file.
#[derive(Debug, Default)]
pub struct FileReport {
    pub file: PathBuf,
    pub matches: Vec<MatchRecord>,
    /// Set when the file stopped being readable part way through
    pub error: Option<ScanError>,
}

/// Lazy sequence of matches for one (file, pattern) pair
pub struct Scan<'p> {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    pattern: &'p PatternSpec,
    line_number: usize,
    pending: VecDeque<MatchRecord>,
    done: bool,
}

/// Opens `path` and prepares to scan it with `pattern`
pub fn scan<'p>(path: &Path, pattern: &'p PatternSpec) -> Result<Scan<'p>, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Scan {
        path: path.to_path_buf(),
        lines: BufReader::new(file).lines(),
        pattern,
        line_number: 0,
        pending: VecDeque::new(),
        done: false,
    })
}

impl Scan<'_> {
    fn collect_line(&mut self, line: &str) {
        for m in self.pattern.find_in_line(line) {
            self.pending.push_back(MatchRecord {
                file: self.path.clone(),
                line: self.line_number,
                column: char_column(line, m.start()),
                category: self.pattern.category,
                dialect: self.pattern.dialect,
                pattern: self.pattern.name,
                glyph: self.pattern.glyph,
                text: m.as_str().to_string(),
            });
        }
    }
}

impl Iterator for Scan<'_> {
    type Item = Result<MatchRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.done {
                return None;
            }

            match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_number += 1;
                    // `lines()` already drops "\n" and "\r\n"; a bare trailing
                    // "\r" is dropped here
                    let line = line.strip_suffix('\r').unwrap_or(&line);
                    self.collect_line(line);
                }
                Some(Err(source)) => {
                    self.done = true;
                    return Some(Err(ScanError::Read {
                        path: self.path.clone(),
                        line: self.line_number + 1,
                        source,
                    }));
                }
                None => {
                    self.done = true;
                }
            }
        }
    }
}

/// 1-based character column of the byte offset `start` within `line`
pub fn char_column(line: &str, start: usize) -> usize {
    line[..start].chars().count() + 1
}

/// Runs every active catalog entry over `path`, in catalog order.
///
/// The first open or read error ends the scan of this file. Every match
/// found before the error is kept, including the ones the failing entry
/// produced for the lines it read successfully.
pub fn scan_file(path: &Path, catalog: &PatternCatalog) -> FileReport {
    let mut report = FileReport {
        file: path.to_path_buf(),
        ..Default::default()
    };

    'patterns: for pattern in catalog.active() {
        let records = match scan(path, pattern) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(file = %path.display(), pattern = pattern.name, "scan aborted: {err}");
                report.error = Some(err);
                break;
            }
        };

        for record in records {
            match record {
                Ok(record) => report.matches.push(record),
                Err(err) => {
                    tracing::warn!(file = %path.display(), pattern = pattern.name, "scan aborted: {err}");
                    report.error = Some(err);
                    break 'patterns;
                }
            }
        }
    }

    tracing::debug!(file = %path.display(), matches = report.matches.len(), "scanned");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::patterns::CatalogOptions;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn catalog() -> PatternCatalog {
        PatternCatalog::new(CatalogOptions::default()).unwrap()
    }

    fn scan_all(path: &Path, catalog: &PatternCatalog, name: &str) -> Vec<MatchRecord> {
        scan(path, catalog.get(name).unwrap())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_image_at_column_one() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.md", b"# Title\n![alt](img.png)\n");
        let catalog = catalog();

        let images = scan_all(&path, &catalog, "md-image");
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].line, 2);
        assert_eq!(images[0].column, 1);
        assert_eq!(images[0].text, "![alt](img.png)");
        assert_eq!(images[0].category, Category::Image);
    }

    #[test]
    fn test_link_column_points_at_bracket() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.md", b"See [text](http://example.com) for more\n");
        let catalog = catalog();

        let links = scan_all(&path, &catalog, "md-link-inline");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].column, 5);
        assert_eq!(links[0].text, "[text](http://example.com)");
    }

    #[test]
    fn test_column_counts_characters_not_bytes() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "a.md",
            "héllo wörld <https://example.org>\r\n".as_bytes(),
        );
        let catalog = catalog();

        let urls = scan_all(&path, &catalog, "md-url-angle");
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].column, 13);
        assert_eq!(urls[0].text, "<https://example.org>");
    }

    #[test]
    fn test_multiple_matches_per_line_and_last_line_without_newline() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.md", b"text\n'https://a.io' and 'http://b.io'");
        let catalog = catalog();

        let urls = scan_all(&path, &catalog, "md-url-single-quote");
        let positions: Vec<_> = urls.iter().map(|m| (m.line, m.column)).collect();
        assert_eq!(positions, vec![(2, 1), (2, 20)]);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "a.md",
            b"[a](a.md) ![i](i.png) <https://x.io>\n<img src=\"y.png\">\n",
        );
        let catalog = catalog();

        let first = scan_file(&path, &catalog);
        let second = scan_file(&path, &catalog);
        assert!(first.error.is_none());
        assert_eq!(first.matches, second.matches);
        assert_eq!(first.matches.len(), 4);
    }

    #[test]
    fn test_scan_file_groups_by_catalog_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.md", b"<https://x.io> [a](a.md)\n![i](i.png)\n");
        let catalog = catalog();

        let report = scan_file(&path, &catalog);
        let categories: Vec<_> = report.matches.iter().map(|m| m.category).collect();
        assert_eq!(
            categories,
            vec![Category::Image, Category::Link, Category::Url]
        );
    }

    #[test]
    fn test_missing_file_is_an_open_error() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog();
        let missing = dir.path().join("gone.md");

        assert!(matches!(
            scan(&missing, catalog.get("md-image").unwrap()),
            Err(ScanError::Open { .. })
        ));

        let report = scan_file(&missing, &catalog);
        assert!(report.matches.is_empty());
        assert!(report.error.is_some());
    }

    #[test]
    fn test_invalid_utf8_stops_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.md", b"![a](a.png)\n\xff\xfe broken\n![b](b.png)\n");
        let catalog = catalog();

        let results: Vec<_> = scan(&path, catalog.get("md-image").unwrap())
            .unwrap()
            .collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ScanError::Read { line: 2, .. })));

        // The image on line 1 was read before the bad line and is kept
        let report = scan_file(&path, &catalog);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].text, "![a](a.png)");
        assert!(matches!(report.error, Some(ScanError::Read { line: 2, .. })));
    }
}
