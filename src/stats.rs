//! Run accounting: live counters, the end-of-run summary, and the
//! persisted state file.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::utils::format_count;

/// Counters shared across fetch/extract/validate tasks. Every task records
/// a structured outcome here instead of fire-and-forget logging, so the
/// orchestrator can report an accurate failure summary.
#[derive(Debug, Default)]
pub struct RunCounters {
    pub sources_fetched: AtomicUsize,
    pub sources_failed: AtomicUsize,
    pub lines_scanned: AtomicUsize,
    pub candidates: AtomicUsize,
    pub rejected_syntax: AtomicUsize,
    pub rejected_suffix: AtomicUsize,
    pub duplicates_skipped: AtomicUsize,
    pub validated: AtomicUsize,
    pub invalid: AtomicUsize,
}

impl RunCounters {
    pub fn add(counter: &AtomicUsize, n: usize) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunSummary {
        RunSummary {
            sources_fetched: self.sources_fetched.load(Ordering::Relaxed),
            sources_failed: self.sources_failed.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            rejected_syntax: self.rejected_syntax.load(Ordering::Relaxed),
            rejected_suffix: self.rejected_suffix.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            validated: self.validated.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of the run counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub sources_fetched: usize,
    pub sources_failed: usize,
    pub lines_scanned: usize,
    pub candidates: usize,
    pub rejected_syntax: usize,
    pub rejected_suffix: usize,
    pub duplicates_skipped: usize,
    pub validated: usize,
    pub invalid: usize,
}

impl RunSummary {
    /// Print the summary table. This is the minimum observable outcome of a
    /// run even at default verbosity.
    pub fn print(&self) {
        println!();
        println!("════════════════════════════════════════════");
        println!(" HOSTSMITH RUN SUMMARY");
        println!("════════════════════════════════════════════");
        println!(
            " Sources fetched:   {:>10}",
            format_count(self.sources_fetched)
        );
        println!(
            " Sources failed:    {:>10}",
            format_count(self.sources_failed)
        );
        println!(
            " Lines scanned:     {:>10}",
            format_count(self.lines_scanned)
        );
        println!(" Candidates:        {:>10}", format_count(self.candidates));
        println!(
            " Rejected (syntax): {:>10}",
            format_count(self.rejected_syntax)
        );
        println!(
            " Rejected (suffix): {:>10}",
            format_count(self.rejected_suffix)
        );
        println!(
            " Duplicates:        {:>10}",
            format_count(self.duplicates_skipped)
        );
        println!(" Validated:         {:>10}", format_count(self.validated));
        println!(" Invalid:           {:>10}", format_count(self.invalid));
        println!("════════════════════════════════════════════");
        println!();
    }
}

/// Per-source result recorded in the state file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStats {
    pub url: String,
    pub category: String,
    pub candidates: usize,
    pub failed: bool,
}

/// Persistent state written after each update run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunState {
    pub last_update: Option<DateTime<Utc>>,
    pub summary: RunSummary,
    pub sources: Vec<SourceStats>,
}

impl RunState {
    /// Load state from file; missing file yields the default.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save state to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
