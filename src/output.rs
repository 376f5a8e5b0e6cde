//! Status output for every workflow step.
//!
//! # Output Format
//!
//! ## Listing
//!
//! ```text
//! Lot images (3)
//! 001 Lot001.jpg
//! 002 Lot002.jpg
//! 003 photo_c.png
//! ```
//!
//! ## Convert
//!
//! ```text
//! Purged Lot001.jpg → Temp Processing/Lot001.jpg
//! photo_a.png → Lot001.jpg (800×600)
//!     Archived: Original Lot Sticker Images/photo_a.png
//! broken.jpg: skipped (Decode failed: ...)
//! Converted 1 of 2 images
//! ```
//!
//! ## Rename
//!
//! ```text
//! Lot003.jpg → Lot001.jpg
//! Lot001.jpg → Lot002.jpg: FAILED (Lot002.jpg is still occupied; file left at Lot002.jpg.tmp)
//! Renamed 1 of 2 files, 1 already in place
//! Orphaned temporary files (rename or remove by hand):
//!     Lot002.jpg.tmp
//! ```
//!
//! # Architecture
//!
//! Each result type has a `format_*` function (returns `Vec<String>`) for
//! testability. Format functions are pure: no I/O, no side effects.
//! [`StatusLog`] is the only writer; it prints lines to stdout and appends
//! them to the persistent log file.

use crate::convert::{ConvertOutcome, ConvertReport};
use crate::finalize::{MoveOutcome, MoveResult};
use crate::rename::{self, Outcome, RenameResult};
use crate::scan::ImageFile;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Last path component, or the whole path when there is none.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Path relative to `root` when it lies beneath it.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Listing
// ============================================================================

/// Format a listing in display order.
pub fn format_listing(title: &str, files: &[ImageFile]) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", title, files.len())];
    for (i, file) in files.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file.display_name));
    }
    lines
}

// ============================================================================
// Convert-and-Archive
// ============================================================================

/// Format a convert report. Paths are shown relative to `root` (the dump).
pub fn format_convert_report(report: &ConvertReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for purged in &report.purged {
        lines.push(format!(
            "Purged {} \u{2192} {}",
            file_name(&purged.source),
            relative(&purged.destination, root)
        ));
    }

    for result in &report.results {
        let source = file_name(&result.source);
        match (&result.output, &result.outcome) {
            (_, ConvertOutcome::Skipped(reason)) => {
                lines.push(format!("{}: skipped ({})", source, reason));
            }
            (Some(output), outcome) => {
                let size = result
                    .size
                    .map(|(w, h)| format!(" ({}\u{d7}{})", w, h))
                    .unwrap_or_default();
                lines.push(format!("{} \u{2192} {}{}", source, file_name(output), size));
                match outcome {
                    ConvertOutcome::Converted { archived } => {
                        lines.push(format!("{}Archived: {}", indent(1), relative(archived, root)));
                    }
                    ConvertOutcome::ConvertedNotArchived(reason) => {
                        lines.push(format!("{}Not archived: {}", indent(1), reason));
                    }
                    ConvertOutcome::Skipped(_) => {}
                }
            }
            (None, _) => lines.push(format!("{}: no output", source)),
        }
    }

    lines.push(format!(
        "Converted {} of {} images",
        report.converted(),
        report.results.len()
    ));
    if report.purge_only() {
        lines.push(format!(
            "Warning: no new images in the dump; {} existing canonical files were moved aside and nothing was regenerated",
            report.purged.len()
        ));
    }
    lines
}

// ============================================================================
// Ordered rename
// ============================================================================

/// Format rename results, the summary, and any orphaned temp files.
///
/// `total` is the number of files in the committed order, so files that were
/// already in place show up in the summary.
pub fn format_rename_results(results: &[RenameResult], total: usize) -> Vec<String> {
    if results.is_empty() {
        return vec![format!("Order already applied ({} files)", total)];
    }

    let mut lines = Vec::new();
    for result in results {
        let pair = format!(
            "{} \u{2192} {}",
            file_name(&result.source),
            file_name(&result.target)
        );
        match &result.outcome {
            Outcome::Applied => lines.push(pair),
            Outcome::Failed(failure) => lines.push(format!("{}: FAILED ({})", pair, failure)),
        }
    }

    let applied = results.iter().filter(|r| r.is_applied()).count();
    let unchanged = total.saturating_sub(results.len());
    let mut summary = format!("Renamed {} of {} files", applied, results.len());
    if unchanged > 0 {
        summary.push_str(&format!(", {} already in place", unchanged));
    }
    lines.push(summary);

    let orphans = rename::orphans(results);
    if !orphans.is_empty() {
        lines.push("Orphaned temporary files (rename or remove by hand):".to_string());
        for orphan in orphans {
            lines.push(format!("{}{}", indent(1), orphan.display()));
        }
    }
    lines
}

// ============================================================================
// Finalize
// ============================================================================

pub fn format_move_results(results: &[MoveResult]) -> Vec<String> {
    let mut lines = Vec::new();
    for result in results {
        match &result.outcome {
            MoveOutcome::Moved => lines.push(format!("Moved {}", file_name(&result.source))),
            MoveOutcome::Failed(reason) => lines.push(format!(
                "{}: not moved ({})",
                file_name(&result.source),
                reason
            )),
        }
    }
    let moved = results.iter().filter(|r| r.is_moved()).count();
    lines.push(format!("Finalized {} of {} lot images", moved, results.len()));
    lines
}

// ============================================================================
// Status log
// ============================================================================

/// Prints status lines and keeps a persistent copy in a log file.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    path: Option<PathBuf>,
    quiet: bool,
}

impl StatusLog {
    /// Log to stdout and append to `path`.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            quiet: false,
        }
    }

    /// Log to stdout only.
    pub fn stdout_only() -> Self {
        Self::default()
    }

    /// Keep writing the file but stop printing (used with `--json`).
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Print `lines` and append them to the log file, if any.
    pub fn emit(&self, lines: &[String]) -> io::Result<()> {
        if !self.quiet {
            for line in lines {
                println!("{}", line);
            }
        }
        match &self.path {
            Some(path) => append_lines(path, lines),
            None => Ok(()),
        }
    }
}

fn append_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}
