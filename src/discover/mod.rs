// src/discover/mod.rs
// =============================================================================
// This module finds the Markdown files a run should scan.
//
// Submodules:
// - walk: Walks a directory tree with walkdir
// - resolve: Validates and deduplicates the command-line path arguments
// =============================================================================

mod walk;
mod resolve;

pub use resolve::resolve;
