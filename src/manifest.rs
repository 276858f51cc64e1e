//! The dependency manifest — parsing, backup-first loading, serialization.
//!
//! `cmake/deps.txt` is a semicolon-delimited list, three fields per row:
//!
//! ```text
//! # name;location;checksum
//! abseil_cpp;https://github.com/abseil/abseil-cpp/archive/refs/tags/20240722.0.zip;36ee53eb1466fb652aebf37132650a1878f46a39
//! onnx;/build/deps/github.com_onnx_onnx_archive_v1.16.zip;2eb9198bb352757d5ff13977cbe0634898e0837c
//! ```
//!
//! Rows starting with `#` are comments.  Rows that do not have exactly
//! three fields are ignored.  Both are dropped silently on load — the
//! filter is deliberately best-effort, not a validation pass — and are
//! never written back out.
//!
//! # Backup-first loading
//!
//! The first run copies the pristine manifest to `cmake/deps.txt.bak`
//! before reading it.  Every later run reads the backup instead of the
//! (by then rewritten) live manifest, so the output is always derived
//! from the original URL list and re-running the tool never
//! double-transforms already-local paths.

use std::fs;

use anyhow::{Context, Result};

use crate::{config::Locations, ui};

/// Field separator within a manifest row.
pub const DELIMITER: char = ';';

/// First character of a comment row.
pub const COMMENT_MARKER: char = '#';

/// One `name;location;checksum` row.
///
/// `location` is either a remote URL or a local filesystem path; the
/// checksum is carried through verbatim and never recomputed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    pub name: String,
    pub location: String,
    pub checksum: String,
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// Parse manifest text into entries, preserving row order.
///
/// Rows are split on [`DELIMITER`] after stripping a trailing `\r` (the
/// manifest is occasionally checked out with CRLF endings on Windows
/// agents).  Fields are not trimmed or unquoted.
pub fn parse(text: &str) -> Vec<DependencyEntry> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != 3 {
            continue;
        }
        if fields[0].starts_with(COMMENT_MARKER) {
            continue;
        }
        entries.push(DependencyEntry {
            name: fields[0].to_string(),
            location: fields[1].to_string(),
            checksum: fields[2].to_string(),
        });
    }
    entries
}

/// Serialize entries back to manifest text, one row per entry, in order.
pub fn serialize(entries: &[DependencyEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        out.push_str(&e.name);
        out.push(DELIMITER);
        out.push_str(&e.location);
        out.push(DELIMITER);
        out.push_str(&e.checksum);
        out.push('\n');
    }
    out
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Load the manifest entries, preferring the backup copy.
///
/// 1. If the backup exists, read it — it is the pristine URL list.
/// 2. Otherwise copy the live manifest to the backup path first, then read
///    the live manifest.
///
/// A missing manifest (with no backup to fall back on) is fatal.
pub fn load(loc: &Locations) -> Result<Vec<DependencyEntry>> {
    let source = if loc.backup.exists() {
        &loc.backup
    } else {
        ui::note(&format!("making a copy to {}", loc.backup.display()));
        fs::copy(&loc.manifest, &loc.backup)
            .with_context(|| format!("backing up {}", loc.manifest.display()))?;
        &loc.manifest
    };

    ui::note(&format!("reading from {}", source.display()));
    let text = fs::read_to_string(source)
        .with_context(|| format!("reading {}", source.display()))?;
    Ok(parse(&text))
}

/// Overwrite the live manifest with `entries`.
pub fn write(loc: &Locations, entries: &[DependencyEntry]) -> Result<()> {
    ui::note(&format!("writing to {}", loc.manifest.display()));
    fs::write(&loc.manifest, serialize(entries))
        .with_context(|| format!("writing {}", loc.manifest.display()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
