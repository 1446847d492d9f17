// src/error.rs
// =============================================================================
// Typed errors for the three places a run can partially fail:
//
// 1. ArgumentError  - a path given on the command line is unusable
// 2. DiscoveryError - a directory could not be read while walking a tree
// 3. ScanError      - a Markdown file could not be opened or read
//
// None of these abort the run. They are collected, printed to stderr and
// downgrade the exit status. `anyhow` is still used at the top level for
// truly unexpected failures (stdout closed, no working directory, ...).
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// A command-line path that failed validation
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// A regular file whose name does not end in `.md`
    #[error("{path} is not a MarkDown file. It doesn't have the '.md' extension.")]
    NotMarkdown { path: String },

    /// Missing path, or something that is neither a file nor a directory
    #[error("{path} is neither a regular file or a directory.")]
    NotFileOrDirectory { path: String },
}

/// A failure while walking a directory tree
#[derive(Debug, Error)]
#[error("cannot read directory {}: {source}", .path.display())]
pub struct DiscoveryError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// A failure while opening or reading a Markdown file
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {} at line {line}: {source}", .path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("pattern '{name}' failed to compile: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// A problem found while resolving the path arguments
#[derive(Debug, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}
