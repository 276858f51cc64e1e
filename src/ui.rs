//! Terminal output — notes, download progress, and the run summary.
//!
//! # Design goals
//!
//! - **Quiet by default.** Each entry gets a single status line (cached /
//!   downloading / unchanged); the only animated element is the byte
//!   progress bar while a transfer is in flight.
//! - **Informative on failure.** Failed downloads are collected into the
//!   summary so the operator sees every unreachable dependency at the end
//!   of the run, not just the last one scrolled past.
//! - **Testable without a terminal.** [`RunSummary`] is a plain data type;
//!   the rendering functions only format and print.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Green ✓  — entry handled (downloaded or cached).
fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
/// Red ✗    — download exhausted its retries.
fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}
/// Cyan ↓   — transfer starting.
fn icon_fetch() -> console::StyledObject<&'static str> {
    style("↓").cyan().bold()
}

// ─── Status lines ─────────────────────────────────────────────────────────────

/// Dim informational note (file copies, read/write announcements).
pub fn note(msg: &str) {
    println!("  {}", style(msg).dim());
}

/// Warning to stderr (retry notices and other recoverable trouble).
pub fn warn(msg: &str) {
    eprintln!("  {} {}", style("warning:").yellow().bold(), msg);
}

/// Announce a starting download.
pub fn fetching(url: &str) {
    println!("  {}  {}", icon_fetch(), url);
}

/// Announce a cache hit at `path`.
pub fn cached(path: &str) {
    println!("  {}  {} {}", icon_ok(), style("cached").dim(), path);
}

// ─── Progress bar ─────────────────────────────────────────────────────────────

/// Byte progress bar for a streaming download.
///
/// With a known content length the bar shows position/total and rate;
/// without one it degrades to a running byte counter.
pub fn download_bar(len: Option<u64>) -> ProgressBar {
    match len {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::with_template(
                    "     {bar:32.cyan/blue} {bytes}/{total_bytes} {bytes_per_sec}",
                )
                .unwrap(),
            );
            pb
        },
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("     {spinner:.cyan} {bytes} {bytes_per_sec}")
                    .unwrap(),
            );
            pb
        },
    }
}

// ─── Run summary ─────────────────────────────────────────────────────────────

/// Counters collected across one pipeline run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Entries fetched over the network this run.
    pub downloaded: usize,
    /// Entries whose archive was already on disk.
    pub cached: usize,
    /// Entries rewritten to a local path (downloaded, cached, or neither
    /// when `--download 0`).
    pub rewritten: usize,
    /// Entries passed through untouched.
    pub passthrough: usize,
    /// `(name, url)` of entries whose download exhausted its retries.
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    pub fn clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Print the end-of-run banner.
///
/// Failures are listed individually but do not change the exit status —
/// the manifest has still been rewritten, and whichever build step opens
/// the missing archives will report them again.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "  {} rewritten, {} downloaded, {} cached, {} unchanged",
        style(summary.rewritten).bold(),
        style(summary.downloaded).bold(),
        style(summary.cached).bold(),
        style(summary.passthrough).bold(),
    );
    if summary.clean() {
        println!("  {} {}", icon_ok(), style("Manifest updated.").cyan().bold());
    } else {
        eprintln!(
            "  {}  {}",
            icon_err(),
            style("Some downloads failed; their manifest entries point at files that do not exist yet.")
                .red()
                .bold()
        );
        for (name, url) in &summary.failed {
            eprintln!("    {} {} ({url})", icon_err(), style(name).red());
        }
    }
    println!();
}

// ─── Tests ────────────────────────────────────────────────────────────────────
