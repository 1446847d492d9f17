// src/scanner/patterns.rs
// =============================================================================
// The pattern catalog: a fixed, ordered table of regular expressions that
// recognise images, links and URLs written in Markdown or raw HTML.
//
// The table is built once at startup and never changes afterwards. Each
// entry carries:
// - a name (for diagnostics and tests)
// - a category (Image, Link, Url) and a dialect (Markdown, Html)
// - the compiled expression
// - a glyph printed in front of every match
// - an optional guard (see below)
// - which href policy it belongs to
//
// Guards: the `regex` crate has no look-behind, so "a link not preceded by
// `!`" cannot be written inside the expression. Instead the entry carries
// `Guard::NotPrecededBy('!')` and matches that fail the guard are dropped.
// The reported span is always the construct itself, never the guard char.
// =============================================================================

use regex::{Match, Regex};
use serde::Serialize;
use std::fmt;

use crate::error::ScanError;

/// What kind of reference a pattern finds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Image,
    Link,
    Url,
}

impl Category {
    /// Report order: images, then links, then URLs
    pub const ALL: [Category; 3] = [Category::Image, Category::Link, Category::Url];

    /// Plural label used in grouping headers ("Images in README.md:")
    pub fn heading(self) -> &'static str {
        match self {
            Category::Image => "Images",
            Category::Link => "Links",
            Category::Url => "URLs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Image => "image",
            Category::Link => "link",
            Category::Url => "url",
        };
        f.write_str(label)
    }
}

/// Which syntax the construct is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Markdown,
    Html,
}

/// Extra condition a match must satisfy beyond the expression itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The match must not start the line, and the character right before
    /// it must not be this one
    NotPrecededBy(char),
}

/// How HTML `href` attributes are matched.
///
/// Only one family of href entries runs per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HrefPolicy {
    /// Any quoted value: `href="../guide.md"`, `href='#top'`, ...
    #[default]
    AnyValue,
    /// Only values starting with `http://` or `https://`
    StrictUrl,
}

/// Which policies an entry is active under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applies {
    Always,
    Only(HrefPolicy),
}

/// Switches that shape the catalog at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogOptions {
    pub href_policy: HrefPolicy,
    /// Keep `[text](#anchor)` links instead of dropping them
    pub include_fragments: bool,
}

/// One entry of the catalog
#[derive(Debug, Clone)]
pub struct PatternSpec {
    pub name: &'static str,
    pub category: Category,
    pub dialect: Dialect,
    pub glyph: &'static str,
    expression: Regex,
    guard: Option<Guard>,
    applies: Applies,
}

impl PatternSpec {
    /// All non-overlapping matches in a single line, left to right.
    ///
    /// A match rejected by the guard still consumes its span; scanning
    /// resumes after it, exactly as if it had been reported.
    pub fn find_in_line<'a>(&'a self, line: &'a str) -> impl Iterator<Item = Match<'a>> + 'a {
        self.expression
            .find_iter(line)
            .filter(move |m| self.guard_allows(line, m.start()))
    }

    fn guard_allows(&self, line: &str, start: usize) -> bool {
        match self.guard {
            None => true,
            Some(Guard::NotPrecededBy(forbidden)) => line[..start]
                .chars()
                .next_back()
                .is_some_and(|prev| prev != forbidden),
        }
    }
}

// A row of the static table before compilation
struct Row {
    name: &'static str,
    category: Category,
    dialect: Dialect,
    source: String,
    glyph: &'static str,
    guard: Option<Guard>,
    applies: Applies,
}

const IMAGE_GLYPH: &str = "🖼️";
const LINK_GLYPH: &str = "🔗";
const URL_GLYPH: &str = "🌐";

/// The ordered, immutable set of patterns for one run
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    entries: Vec<PatternSpec>,
    options: CatalogOptions,
}

impl PatternCatalog {
    /// Compiles every entry of the table
    pub fn new(options: CatalogOptions) -> Result<Self, ScanError> {
        let entries = rows(options)
            .into_iter()
            .map(|row| {
                let expression = Regex::new(&row.source).map_err(|source| ScanError::Pattern {
                    name: row.name,
                    source,
                })?;
                Ok(PatternSpec {
                    name: row.name,
                    category: row.category,
                    dialect: row.dialect,
                    glyph: row.glyph,
                    expression,
                    guard: row.guard,
                    applies: row.applies,
                })
            })
            .collect::<Result<Vec<_>, ScanError>>()?;

        Ok(Self { entries, options })
    }

    /// Every entry, including the href family that is switched off
    pub fn all(&self) -> &[PatternSpec] {
        &self.entries
    }

    /// The entries that run under the configured href policy, in catalog order
    pub fn active(&self) -> impl Iterator<Item = &PatternSpec> + '_ {
        let policy = self.options.href_policy;
        self.entries.iter().filter(move |spec| match spec.applies {
            Applies::Always => true,
            Applies::Only(p) => p == policy,
        })
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&PatternSpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }
}

fn rows(options: CatalogOptions) -> Vec<Row> {
    // Markdown link target: `(#anchor)` is dropped unless fragments are wanted
    let target = if options.include_fragments {
        r"\([^)]*\)"
    } else {
        r"\((?:[^#)][^)]*)?\)"
    };
    // Bracketed text: plain characters, or one level of nested `[..]`
    // optionally followed by `(..)`, so badge links `[![alt](img)](target)`
    // and `[see [1]](ref.md)` are matched whole
    let text = r"\[(?:[^\[\]]|\[[^\[\]]*\](?:\([^)]*\))?)*\]";
    let link = format!(r"{text}{target}");

    let row = |name: &'static str,
               category: Category,
               dialect: Dialect,
               source: String,
               guard: Option<Guard>,
               applies: Applies| {
        let glyph = match category {
            Category::Image => IMAGE_GLYPH,
            Category::Link => LINK_GLYPH,
            Category::Url => URL_GLYPH,
        };
        Row {
            name,
            category,
            dialect,
            source,
            glyph,
            guard,
            applies,
        }
    };

    use Applies::{Always, Only};
    use Category::{Image, Link, Url};
    use Dialect::{Html, Markdown};
    use HrefPolicy::{AnyValue, StrictUrl};

    vec![
        // ![alt](path)
        row("md-image", Image, Markdown, format!(r"!{text}\([^)]*\)"), None, Always),
        // <img ... src="path" ...>
        row(
            "html-image-double",
            Image,
            Html,
            r#"<img[^>]*\bsrc[ \t]*=[ \t]*"[^"]*"[^>]*>"#.into(),
            None,
            Always,
        ),
        row(
            "html-image-single",
            Image,
            Html,
            r"<img[^>]*\bsrc[ \t]*=[ \t]*'[^']*'[^>]*>".into(),
            None,
            Always,
        ),
        // [text](path) somewhere after the first column, not an image
        row(
            "md-link-inline",
            Link,
            Markdown,
            link.clone(),
            Some(Guard::NotPrecededBy('!')),
            Always,
        ),
        // [text](path) opening the line
        row("md-link-line-start", Link, Markdown, format!("^{link}"), None, Always),
        // href="..." with any value
        row(
            "html-href-double",
            Link,
            Html,
            r#"href[ \t]*=[ \t]*"[^"]*""#.into(),
            None,
            Only(AnyValue),
        ),
        row(
            "html-href-single",
            Link,
            Html,
            r"href[ \t]*=[ \t]*'[^']*'".into(),
            None,
            Only(AnyValue),
        ),
        // href="http(s)://..." only
        row(
            "html-href-url-double",
            Link,
            Html,
            r#"href[ \t]*=[ \t]*"https?://[^"]*""#.into(),
            None,
            Only(StrictUrl),
        ),
        row(
            "html-href-url-single",
            Link,
            Html,
            r"href[ \t]*=[ \t]*'https?://[^']*'".into(),
            None,
            Only(StrictUrl),
        ),
        // <https://example.org>, "https://example.org", 'https://example.org'
        row("md-url-angle", Url, Markdown, r"<https?://[^ >]*>".into(), None, Always),
        row(
            "md-url-double-quote",
            Url,
            Markdown,
            r#""https?://[^ "]*""#.into(),
            None,
            Always,
        ),
        row(
            "md-url-single-quote",
            Url,
            Markdown,
            r"'https?://[^ ']*'".into(),
            None,
            Always,
        ),
    ]
}
