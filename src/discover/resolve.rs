// src/discover/resolve.rs
// =============================================================================
// Turns the command-line path arguments into the set of files to scan.
//
// Steps:
// 1. No arguments means "the current directory"
// 2. Duplicate arguments are dropped (order and repeats don't matter)
// 3. Each argument is classified: Markdown file, other file, directory,
//    or neither
// 4. Files are added directly, directories are walked, everything else
//    becomes a diagnostic and downgrades the exit status
//
// Files are deduplicated by canonical path, so `docs` and `docs/guide.md`
// given together scan guide.md once.
//
// Rust concepts:
// - BTreeSet: a sorted set, so the processing order is deterministic
// - HashSet: O(1) "have we seen this file already?" checks
// - Enums with data: each diagnostic carries the offending path
// =============================================================================

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::walk::{discover_dir, is_markdown};
use crate::error::{ArgumentError, Diagnostic};
use crate::status::ExitStatus;

/// What a path argument turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    MarkdownFile,
    OtherFile,
    Directory,
    /// Missing, or a socket/FIFO/device
    Nonexistent,
}

// Classifies a path, following symlinks
//
// Parameters:
//   path: a path argument exactly as given on the command line
//
// Returns: which of the four kinds it is. Anything fs::metadata can't
// describe as a file or directory (missing, socket, FIFO) is Nonexistent.
pub fn classify(path: &Path) -> PathKind {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {
            if is_markdown(path) {
                PathKind::MarkdownFile
            } else {
                PathKind::OtherFile
            }
        }
        Ok(metadata) if metadata.is_dir() => PathKind::Directory,
        _ => PathKind::Nonexistent,
    }
}

/// Set of files to scan.
///
/// Deduplicates by canonical path and keeps the first spelling seen for
/// display. Iterates in sorted display order.
#[derive(Debug, Default)]
pub struct FileSet {
    seen: HashSet<PathBuf>,
    files: BTreeSet<PathBuf>,
}

impl FileSet {
    /// Adds a file; returns false if the same file is already present
    pub fn insert(&mut self, path: PathBuf) -> bool {
        // Two spellings of one file share a canonical path. If the file
        // vanished meanwhile, fall back to the path as given.
        let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if !self.seen.insert(key) {
            debug!(file = %path.display(), "duplicate file, skipping");
            return false;
        }
        self.files.insert(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.files.into_iter().collect()
    }
}

/// Outcome of argument resolution
#[derive(Debug, Default)]
pub struct Resolution {
    pub files: FileSet,
    pub status: ExitStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    fn fail(&mut self, diagnostic: Diagnostic) {
        self.status.downgrade();
        self.diagnostics.push(diagnostic);
    }
}

// Resolves path arguments into a deduplicated set of Markdown files
//
// Parameters:
//   arguments: the raw path arguments (may be empty)
//
// Returns: Resolution with the files to scan, the diagnostics to print
// and the status so far
pub fn resolve(arguments: &[String]) -> Resolution {
    // Remove duplicated arguments; an empty list means the current directory
    let mut unique: BTreeSet<&str> = arguments.iter().map(String::as_str).collect();
    if unique.is_empty() {
        unique.insert(".");
    }

    let mut resolution = Resolution::default();

    for argument in unique {
        let path = Path::new(argument);
        match classify(path) {
            // A Markdown file is scanned as is
            PathKind::MarkdownFile => {
                resolution.files.insert(path.to_path_buf());
            }
            // A directory is walked for every .md file below it
            PathKind::Directory => {
                let discovery = discover_dir(path);
                debug!(
                    dir = argument,
                    files = discovery.files.len(),
                    errors = discovery.errors.len(),
                    "walked directory"
                );
                for file in discovery.files {
                    resolution.files.insert(file);
                }
                for error in discovery.errors {
                    resolution.fail(Diagnostic::Discovery(error));
                }
            }
            // Everything else is an invalid argument
            PathKind::OtherFile => resolution.fail(Diagnostic::Argument(
                ArgumentError::NotMarkdown {
                    path: argument.to_string(),
                },
            )),
            PathKind::Nonexistent => resolution.fail(Diagnostic::Argument(
                ArgumentError::NotFileOrDirectory {
                    path: argument.to_string(),
                },
            )),
        }
    }

    resolution
}
