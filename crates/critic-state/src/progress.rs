//! Per-job progress accounting.

use crate::types::Tally;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use critic_core::Issue;
use std::time::Instant;

/// Live progress counters for one job.
///
/// A work unit is one `(file, analyzer)` pair; `total_units` is fixed
/// when the executor commits to its plan and only `completed_units`
/// moves after that. Updated exclusively under the job's guard.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_units: usize,
    completed_units: usize,
    current_file: Option<String>,
    started: Option<Instant>,
    tally: Tally,
    last_updated: DateTime<Utc>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            total_units: 0,
            completed_units: 0,
            current_file: None,
            started: None,
            tally: Tally::default(),
            last_updated: Utc::now(),
        }
    }

    /// Commit to a plan of `total_units` units and start the clock.
    pub fn begin(&mut self, total_units: usize) {
        self.total_units = total_units;
        self.started = Some(Instant::now());
        self.last_updated = Utc::now();
    }

    /// Set the current-file label when a unit begins.
    pub fn record_unit_start(&mut self, file: &Utf8Path) {
        self.current_file = Some(file.to_string());
        self.last_updated = Utc::now();
    }

    /// Account one finished unit and fold its issues into the live tally.
    pub fn record_unit_finish(&mut self, issues: &[Issue]) {
        self.completed_units = (self.completed_units + 1).min(self.total_units);
        for issue in issues {
            self.tally.add(issue.severity);
        }
        self.last_updated = Utc::now();
    }

    pub fn total_units(&self) -> usize {
        self.total_units
    }

    pub fn completed_units(&self) -> usize {
        self.completed_units
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    fn elapsed_seconds(&self) -> f64 {
        self.started.map(|s| s.elapsed().as_secs_f64()).unwrap_or(0.0)
    }

    /// Estimated seconds remaining, from the average per-unit time so
    /// far. Unknown until at least one unit has completed.
    fn eta_seconds(&self) -> Option<f64> {
        if self.completed_units == 0 {
            return None;
        }
        let avg = self.elapsed_seconds() / self.completed_units as f64;
        let remaining = self.total_units.saturating_sub(self.completed_units);
        Some((avg * remaining as f64).max(0.0))
    }

    fn fraction(&self) -> f64 {
        if self.total_units == 0 {
            // An empty plan is fully done the moment it starts.
            return if self.started.is_some() { 1.0 } else { 0.0 };
        }
        self.completed_units as f64 / self.total_units as f64
    }

    /// A stable copy of the current progress.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total_units: self.total_units,
            completed_units: self.completed_units,
            fraction: self.fraction(),
            current_file: self.current_file.clone(),
            elapsed_seconds: self.elapsed_seconds(),
            eta_seconds: self.eta_seconds(),
            tally: self.tally.clone(),
            last_updated: self.last_updated,
        }
    }
}

/// A torn-free copy of a job's progress for `status` callers.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressSnapshot {
    pub total_units: usize,
    pub completed_units: usize,
    /// Fractional progress in [0, 1].
    pub fraction: f64,
    pub current_file: Option<String>,
    pub elapsed_seconds: f64,
    /// None until the first unit completes.
    pub eta_seconds: Option<f64>,
    pub tally: Tally,
    pub last_updated: DateTime<Utc>,
}
