//! Driver warnings and per-batch reports.

use crate::analyzer::AnalyzerKind;
use crate::issue::Issue;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Non-fatal trouble a driver ran into. Warnings accumulate on the job;
/// they never change its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The analyzer binary could not be spawned.
    MissingBinary,
    /// The subprocess exceeded its deadline and was terminated.
    Timeout,
    /// The tool produced output the driver could not parse.
    ParseFailure,
    /// A file in the batch could not be read.
    UnreadableFile,
    /// The tool reported an operational error of its own.
    ToolError,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingBinary => "missing-binary",
            Self::Timeout => "timeout",
            Self::ParseFailure => "parse-failure",
            Self::UnreadableFile => "unreadable-file",
            Self::ToolError => "tool-error",
        }
    }
}

/// A structured driver-level warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverWarning {
    /// Name of the analyzer that raised the warning.
    pub analyzer: String,

    /// Warning classification.
    pub kind: WarningKind,

    /// Human-readable detail.
    pub message: String,

    /// Affected file, when the warning is about a single file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Utf8PathBuf>,
}

impl DriverWarning {
    pub fn new(analyzer: AnalyzerKind, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            analyzer: analyzer.name().to_string(),
            kind,
            message: message.into(),
            file: None,
        }
    }

    /// A warning raised outside any driver (plan-time file checks).
    pub fn planner(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            analyzer: "planner".to_string(),
            kind,
            message: message.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<Utf8PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// What a driver hands back for one batch of files.
///
/// A driver never raises for tool-level trouble: missing binaries,
/// timeouts, and unparseable output all come back as an empty (or
/// partial) issue list plus warnings.
#[derive(Debug, Default)]
pub struct DriverReport {
    pub issues: Vec<Issue>,
    pub warnings: Vec<DriverWarning>,
}

impl DriverReport {
    /// A report carrying a single warning and no issues.
    pub fn from_warning(warning: DriverWarning) -> Self {
        Self {
            issues: Vec::new(),
            warnings: vec![warning],
        }
    }
}
