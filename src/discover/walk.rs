// src/discover/walk.rs
// =============================================================================
// This module walks a directory tree looking for Markdown files.
//
// We use the `walkdir` crate which:
// - Walks the tree with its own explicit stack (no recursion, so deep trees
//   cannot overflow our stack)
// - Can follow symbolic links, like stat(2) does
// - Detects symlink loops and reports them instead of spinning forever
//
// How it works:
// 1. Walk every entry below the root
// 2. Regular files whose name ends in `.md` go into the result
// 3. Directories are descended into by walkdir itself
// 4. Errors are sorted into "skip quietly" and "report"
//
// Skipped quietly: symlink loops and dangling symlinks below the root.
// Reported: anything else, e.g. a directory we are not allowed to read.
// A reported directory is skipped; its siblings are still walked.
//
// Rust concepts:
// - Iterators: walkdir hands us one entry (or error) at a time
// - Pattern matching with guards: to classify the errors
// =============================================================================

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::DiscoveryError;

/// Required file name suffix (case-sensitive)
pub const MARKDOWN_SUFFIX: &str = ".md";

/// Result of walking one directory tree
#[derive(Debug, Default)]
pub struct Discovery {
    /// Markdown files found, in walk order
    pub files: Vec<PathBuf>,
    /// Directories (or entries) that could not be read
    pub errors: Vec<DiscoveryError>,
}

// Checks the Markdown-extension rule on the file name only
//
// Parameters:
//   path: any path; only its last component is looked at
//
// Returns: true for "README.md", false for "README.MD" or "notes.txt"
pub fn is_markdown(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(MARKDOWN_SUFFIX))
}

// Walks `root` and collects every regular `.md` file below it
//
// Parameters:
//   root: the directory to walk (a file works too, it yields itself)
//
// Returns: Discovery with the files found and the errors met on the way.
// This never fails as a whole; one bad subtree doesn't stop the walk.
pub fn discover_dir(root: &Path) -> Discovery {
    let mut discovery = Discovery::default();

    // follow_links(true) makes symlinked directories part of the tree
    let walker = WalkDir::new(root).follow_links(true);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // Decide whether this error is worth reporting
                if let Some(error) = classify_error(root, err) {
                    discovery.errors.push(error);
                }
                continue;
            }
        };

        // With follow_links, file_type() describes the link target
        let file_type = entry.file_type();
        if file_type.is_file() && is_markdown(entry.path()) {
            discovery.files.push(entry.into_path());
        } else if !file_type.is_dir() {
            debug!(path = %entry.path().display(), "not a markdown file");
        }
    }

    discovery
}

// Turns a walkdir error into a DiscoveryError, or None when it should be
// skipped quietly
//
// Parameters:
//   root: the walk's root, used when the error carries no path
//   err: the error walkdir reported
fn classify_error(root: &Path, err: walkdir::Error) -> Option<DiscoveryError> {
    let path = err.path().unwrap_or(root).to_path_buf();

    // A symlink pointing back up the tree: walkdir already refused to enter it
    if let Some(ancestor) = err.loop_ancestor() {
        debug!(
            path = %path.display(),
            ancestor = %ancestor.display(),
            "symlink loop, skipping"
        );
        return None;
    }

    let depth = err.depth();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "unknown walk error"));

    // A dangling symlink inside the tree; the root itself missing is reported
    if depth > 0 && source.kind() == io::ErrorKind::NotFound {
        debug!(path = %path.display(), "dangling symlink, skipping");
        return None;
    }

    Some(DiscoveryError { path, source })
}
