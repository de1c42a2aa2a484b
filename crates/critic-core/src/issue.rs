//! Normalized issue model.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Normalized severity scale shared by every analyzer.
///
/// Ordered ascending so `Ord` comparisons read naturally
/// (`Severity::Critical > Severity::Low`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Security,
    Performance,
    Quality,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Security, Category::Performance, Category::Quality];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Quality => "quality",
        }
    }

    /// Parse a category name as it appears in job input.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "security" => Some(Self::Security),
            "performance" => Some(Self::Performance),
            "quality" => Some(Self::Quality),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Stable identifier, unique within a job. Drivers leave this empty;
    /// the executor assigns it when the issue is appended to the job.
    pub id: String,

    /// Project-relative file path.
    pub file: Utf8PathBuf,

    /// 1-based line number.
    pub line: u32,

    /// 1-based column; 0 when the analyzer reports none.
    pub column: u32,

    /// Normalized severity.
    pub severity: Severity,

    /// Normalized category.
    pub category: Category,

    /// Analyzer-native rule identifier (e.g. `no-unused-vars`, `B105`).
    pub rule: String,

    /// Human-readable message.
    pub message: String,

    /// The offending line or a few lines of context, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Name of the analyzer that produced the finding.
    pub analyzer: String,
}
