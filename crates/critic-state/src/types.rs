//! The review-job record and its observable shapes.

use crate::progress::{ProgressSnapshot, ProgressTracker};
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use critic_core::{AnalyzerKind, Category, DriverWarning, Issue, Severity};
use serde::Serialize;
use std::collections::HashSet;

/// Job lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Paused,
    Cancelled,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// The legal transition table.
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Pending, Self::Cancelled)
                | (Self::Pending, Self::Failed)
                | (Self::Running, Self::Paused)
                | (Self::Running, Self::Cancelled)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Failed)
                | (Self::Paused, Self::Running)
                | (Self::Paused, Self::Cancelled)
                | (Self::Paused, Self::Failed)
        )
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live severity tally.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tally {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl Tally {
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
        self.total += 1;
    }
}

/// Validated input for one review job.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    /// Absolute project root; analyzers run with this as their working
    /// directory.
    pub project_root: Utf8PathBuf,

    /// Project-relative files, in the caller's order.
    pub files: Vec<Utf8PathBuf>,

    /// Enabled analyzers.
    pub analyzers: Vec<AnalyzerKind>,

    /// Only issues in these categories are kept.
    pub categories: Vec<Category>,
}

/// One review job: input, lifecycle, progress, and accumulated output.
///
/// Mutated only by the executor that owns it and by control operations,
/// always under the job's mutex.
#[derive(Debug)]
pub struct ReviewJob {
    pub id: String,
    pub input: ReviewInput,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub progress: ProgressTracker,
    pub issues: Vec<Issue>,
    pub warnings: Vec<DriverWarning>,
    /// Terminal error message when `Failed`.
    pub error: Option<String>,
    next_issue_seq: u32,
}

impl ReviewJob {
    pub fn new(id: String, input: ReviewInput) -> Self {
        Self {
            id,
            input,
            state: JobState::Pending,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            progress: ProgressTracker::new(),
            issues: Vec::new(),
            warnings: Vec::new(),
            error: None,
            next_issue_seq: 1,
        }
    }

    /// Apply a state transition if the machine allows it. Timestamps are
    /// maintained here so every path through the executor agrees on them.
    pub fn transition(&mut self, next: JobState) -> bool {
        if !self.state.can_transition_to(next) {
            return false;
        }
        match next {
            JobState::Running if self.started_at.is_none() => {
                self.started_at = Some(Utc::now());
            }
            JobState::Completed | JobState::Failed | JobState::Cancelled => {
                self.finished_at = Some(Utc::now());
            }
            _ => {}
        }
        self.state = next;
        true
    }

    /// Record one finished work unit: assign ids, append its issues in
    /// production order, fold the tally.
    pub fn record_unit_finish(&mut self, mut issues: Vec<Issue>) {
        for issue in &mut issues {
            issue.id = format!("issue-{}", self.next_issue_seq);
            self.next_issue_seq += 1;
        }
        self.progress.record_unit_finish(&issues);
        self.issues.extend(issues);
    }

    /// Mark the job failed with a terminal message.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.transition(JobState::Failed) {
            self.error = Some(message.into());
        }
    }

    /// The status shape returned to `status` callers.
    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            id: self.id.clone(),
            state: self.state,
            progress: self.progress.snapshot(),
            created_at: self.created_at,
            started_at: self.started_at,
            finished_at: self.finished_at,
            issues: self.state.is_terminal().then(|| self.issues.clone()),
            warnings: self.warnings.clone(),
            error: self.error.clone(),
        }
    }

    /// The full result, available once the job is terminal.
    pub fn result(&self) -> Option<ReviewResult> {
        if !self.state.is_terminal() {
            return None;
        }
        let elapsed_seconds = match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => (end - start).num_milliseconds().max(0) as f64 / 1000.0,
            _ => 0.0,
        };
        Some(ReviewResult {
            job_id: self.id.clone(),
            state: self.state,
            summary: summarize(&self.issues),
            issues: self.issues.clone(),
            warnings: self.warnings.clone(),
            elapsed_seconds,
            finished_at: self.finished_at,
            project_root: self.input.project_root.clone(),
            error: self.error.clone(),
        })
    }
}

/// Everything a `status` caller sees.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub id: String,
    pub state: JobState,
    pub progress: ProgressSnapshot,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Populated once the job is terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
    pub warnings: Vec<DriverWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated counts over a job's final issue list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub security: usize,
    pub performance: usize,
    pub quality: usize,
    /// Distinct files with at least one issue.
    pub affected_files: usize,
}

/// The exported final result of a terminal job.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResult {
    pub job_id: String,
    pub state: JobState,
    pub summary: ReviewSummary,
    pub issues: Vec<Issue>,
    pub warnings: Vec<DriverWarning>,
    pub elapsed_seconds: f64,
    pub finished_at: Option<DateTime<Utc>>,
    /// Absolute root so callers can resolve the relative issue paths.
    pub project_root: Utf8PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the summary aggregation for an issue list.
pub fn summarize(issues: &[Issue]) -> ReviewSummary {
    let mut summary = ReviewSummary {
        total: issues.len(),
        ..ReviewSummary::default()
    };
    let mut files: HashSet<&Utf8PathBuf> = HashSet::new();
    for issue in issues {
        match issue.severity {
            Severity::Critical => summary.critical += 1,
            Severity::High => summary.high += 1,
            Severity::Medium => summary.medium += 1,
            Severity::Low => summary.low += 1,
        }
        match issue.category {
            Category::Security => summary.security += 1,
            Category::Performance => summary.performance += 1,
            Category::Quality => summary.quality += 1,
        }
        files.insert(&issue.file);
    }
    summary.affected_files = files.len();
    summary
}
