// src/report.rs
// =============================================================================
// Renders scan results to stdout and diagnostics to stderr.
//
// Every match is printed in the same greppable shape:
//
//     <glyph> <file>:<line>:<column>:<matched-text>
//
// The text format adds a file list, a header per category and a summary
// around those lines; the plain format prints only the lines; the json
// format serialises everything with serde_json.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::error::{Diagnostic, ScanError};
use crate::scanner::{Category, FileReport, MatchRecord};
use crate::status::ExitStatus;

/// Counts printed at the end of a text report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub images: usize,
    pub links: usize,
    pub urls: usize,
    pub unreadable: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Summary {
            files: reports.len(),
            ..Default::default()
        };
        for report in reports {
            if report.error.is_some() {
                summary.unreadable += 1;
            }
            for record in &report.matches {
                match record.category {
                    Category::Image => summary.images += 1,
                    Category::Link => summary.links += 1,
                    Category::Url => summary.urls += 1,
                }
            }
        }
        summary
    }
}

#[derive(Serialize)]
struct JsonError {
    file: PathBuf,
    message: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: ExitStatus,
    files: Vec<&'a PathBuf>,
    matches: Vec<&'a MatchRecord>,
    errors: Vec<JsonError>,
    summary: Summary,
}

/// One line per match
pub fn render_match(record: &MatchRecord) -> String {
    format!(
        "{} {}:{}:{}:{}",
        record.glyph,
        record.file.display(),
        record.line,
        record.column,
        record.text
    )
}

/// Writes the report for all scanned files in the chosen format
pub fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    reports: &[FileReport],
    status: ExitStatus,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, reports)?,
        OutputFormat::Plain => write_plain(out, reports)?,
        OutputFormat::Json => write_json(out, reports, status)?,
    }
    out.flush()?;
    Ok(())
}

fn write_plain<W: Write>(out: &mut W, reports: &[FileReport]) -> Result<()> {
    for record in reports.iter().flat_map(|r| &r.matches) {
        writeln!(out, "{}", render_match(record))?;
    }
    Ok(())
}

fn write_text<W: Write>(out: &mut W, reports: &[FileReport]) -> Result<()> {
    writeln!(out, "Markdown files:")?;
    for report in reports {
        writeln!(out, "   {}", report.file.display())?;
    }

    for report in reports {
        // Matches are already in catalog order, which groups them by category
        for category in Category::ALL {
            let mut group = report
                .matches
                .iter()
                .filter(|m| m.category == category)
                .peekable();
            if group.peek().is_none() {
                continue;
            }

            writeln!(out)?;
            writeln!(out, "{} in {}:", category.heading(), report.file.display())?;
            for record in group {
                writeln!(out, "{}", render_match(record))?;
            }
        }
    }

    let summary = Summary::from_reports(reports);
    writeln!(out)?;
    writeln!(out, "📊 Summary:")?;
    writeln!(out, "   📄 Files: {}", summary.files)?;
    writeln!(out, "   🖼️  Images: {}", summary.images)?;
    writeln!(out, "   🔗 Links: {}", summary.links)?;
    writeln!(out, "   🌐 URLs: {}", summary.urls)?;
    if summary.unreadable > 0 {
        writeln!(out, "   ❌ Unreadable: {}", summary.unreadable)?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, reports: &[FileReport], status: ExitStatus) -> Result<()> {
    let document = JsonReport {
        status,
        files: reports.iter().map(|r| &r.file).collect(),
        matches: reports.iter().flat_map(|r| &r.matches).collect(),
        errors: reports
            .iter()
            .filter_map(|r| {
                r.error.as_ref().map(|e| JsonError {
                    file: r.file.clone(),
                    message: e.to_string(),
                })
            })
            .collect(),
        summary: Summary::from_reports(reports),
    };

    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}

/// Writes one diagnostic to the error stream
pub fn write_diagnostic<W: Write>(err: &mut W, diagnostic: &Diagnostic) -> std::io::Result<()> {
    match diagnostic {
        Diagnostic::Argument(error) => {
            writeln!(err, "ERROR: Invalid argument.")?;
            writeln!(err, "      {error}")
        }
        Diagnostic::Discovery(error) => writeln!(err, "ERROR: {error}"),
    }
}

/// Writes a file that could not be scanned to the error stream
pub fn write_scan_error<W: Write>(err: &mut W, error: &ScanError) -> std::io::Result<()> {
    writeln!(err, "ERROR: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArgumentError;
    use crate::scanner::{CatalogOptions, PatternCatalog};

    fn record(category: Category, line: usize, column: usize, text: &str) -> MatchRecord {
        let catalog = PatternCatalog::new(CatalogOptions::default()).unwrap();
        let spec = catalog
            .active()
            .find(|spec| spec.category == category)
            .unwrap();
        MatchRecord {
            file: PathBuf::from("docs/a.md"),
            line,
            column,
            category,
            dialect: spec.dialect,
            pattern: spec.name,
            glyph: spec.glyph,
            text: text.to_string(),
        }
    }

    fn sample() -> Vec<FileReport> {
        vec![
            FileReport {
                file: PathBuf::from("docs/a.md"),
                matches: vec![
                    record(Category::Image, 1, 1, "![alt](img.png)"),
                    record(Category::Link, 3, 5, "[text](http://example.com)"),
                ],
                error: None,
            },
            FileReport {
                file: PathBuf::from("docs/b.md"),
                matches: Vec::new(),
                error: Some(ScanError::Open {
                    path: PathBuf::from("docs/b.md"),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                }),
            },
        ]
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_report(&mut out, format, &sample(), ExitStatus::Failure).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_match_line() {
        let line = render_match(&record(Category::Link, 3, 5, "[text](x.md)"));
        assert_eq!(line, "🔗 docs/a.md:3:5:[text](x.md)");
    }

    #[test]
    fn test_plain_has_only_match_lines() {
        let text = render(OutputFormat::Plain);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "🖼️ docs/a.md:1:1:![alt](img.png)",
                "🔗 docs/a.md:3:5:[text](http://example.com)",
            ]
        );
    }

    #[test]
    fn test_text_has_headers_and_summary() {
        let text = render(OutputFormat::Text);
        assert!(text.starts_with("Markdown files:\n   docs/a.md\n   docs/b.md\n"));
        assert!(text.contains("Images in docs/a.md:\n🖼️ docs/a.md:1:1:![alt](img.png)\n"));
        assert!(text.contains("Links in docs/a.md:"));
        assert!(!text.contains("URLs in docs/a.md:"));
        assert!(!text.contains("in docs/b.md:"));
        assert!(text.contains("   🔗 Links: 1"));
        assert!(text.contains("   ❌ Unreadable: 1"));
    }

    #[test]
    fn test_json_document() {
        let text = render(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["files"].as_array().unwrap().len(), 2);
        assert_eq!(value["matches"][1]["category"], "link");
        assert_eq!(value["matches"][1]["column"], 5);
        assert_eq!(value["errors"][0]["file"], "docs/b.md");
        assert_eq!(value["summary"]["images"], 1);
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_reports(&sample());
        assert_eq!(
            summary,
            Summary {
                files: 2,
                images: 1,
                links: 1,
                urls: 0,
                unreadable: 1,
            }
        );
    }

    #[test]
    fn test_argument_diagnostic_is_two_lines() {
        let mut err = Vec::new();
        let diagnostic = Diagnostic::Argument(ArgumentError::NotMarkdown {
            path: "notes.txt".into(),
        });
        write_diagnostic(&mut err, &diagnostic).unwrap();
        let text = String::from_utf8(err).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("notes.txt is not a MarkDown file"));
    }
}
