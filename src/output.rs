//! CLI output formatting for the check and build stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (section, content file, artifact) is its semantic
//! identity — label and positional index — with filesystem paths shown as
//! secondary context via indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sections
//! 001 Home
//! 002 Blog (2 files)
//!     Source: blog/
//!     001 hello.md (27 bytes)
//!         Title: Hello World
//!     002 notes.md (514 bytes)
//! 003 Downloads
//! 004 Contact
//!
//! Downloads
//!     001 resume.pdf (51234 bytes)
//!
//! Cat whitelist
//!     hello.md
//!     notes.md
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Downloads → downloads/index.html
//! Contact → contact/index.html
//! Blog → blog/index.html
//!
//! Generated 4 pages, 2 content files, 1 download files, 3 assets
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::build::BuildReport;
use crate::config::SiteConfig;
use crate::registry::{self, Registry};
use crate::scan::SiteContent;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format a section header: positional index + label, with optional
/// file count.
///
/// ```text
/// 002 Blog (2 files)
/// 003 Downloads
/// ```
fn section_header(index: usize, label: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({} files)", format_index(index), label, n),
        None => format!("{} {}", format_index(index), label),
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format check stage output showing what a build would pick up.
///
/// Declared content directories that do not exist are flagged: the build
/// skips those sections without a word, so this is where to notice them.
pub fn format_check_output(
    registry: &Registry,
    content: &SiteContent,
    config: &SiteConfig,
) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Sections".to_string());
    for (i, section) in registry.sections().iter().enumerate() {
        let scanned = content
            .sections
            .iter()
            .find(|sc| sc.section.id == section.id);

        match (&section.content_dir, scanned) {
            (Some(dir), Some(sc)) => {
                lines.push(section_header(i + 1, &section.label, Some(sc.files.len())));
                lines.push(format!("    Source: {}/", dir));
                for (j, file) in sc.files.iter().enumerate() {
                    lines.push(format!(
                        "    {} {} ({} bytes)",
                        format_index(j + 1),
                        file.name,
                        file.size
                    ));
                    if let Some(title) = file.meta.get("title") {
                        lines.push(format!("        Title: {}", title));
                    }
                }
            }
            (Some(dir), None) if !registry::is_special(&section.id) => {
                lines.push(section_header(i + 1, &section.label, None));
                lines.push(format!("    Source: {}/ (missing)", dir));
            }
            _ => lines.push(section_header(i + 1, &section.label, None)),
        }
    }

    if !content.downloads.is_empty() {
        lines.push(String::new());
        lines.push("Downloads".to_string());
        for (i, file) in content.downloads.iter().enumerate() {
            lines.push(format!(
                "    {} {} ({} bytes)",
                format_index(i + 1),
                file.name,
                file.size
            ));
        }
        lines.push(format!("    Source: {}/", config.downloads_dir));
    }

    if !content.cat_whitelist.is_empty() {
        lines.push(String::new());
        lines.push("Cat whitelist".to_string());
        for name in &content.cat_whitelist {
            lines.push(format!("    {}", name));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(registry: &Registry, content: &SiteContent, config: &SiteConfig) {
    for line in format_check_output(registry, content, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format build stage output showing every written page and a summary.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for page in &report.pages {
        lines.push(format!("{} \u{2192} {}", page.title, page.path));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages, {} content files, {} download files, {} assets",
        report.pages.len(),
        report.content_files,
        report.download_files,
        report.assets
    ));
    if !report.version.is_empty() {
        lines.push(format!("Deployed version: {}", report.version));
    }

    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
