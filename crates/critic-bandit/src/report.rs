//! Bandit JSON report parsing.

use serde::Deserialize;

/// Top-level `bandit --format json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct BanditReport {
    #[serde(default)]
    pub results: Vec<BanditResult>,

    /// Per-file operational errors (unreadable, syntax trouble).
    #[serde(default)]
    pub errors: Vec<BanditError>,
}

/// One finding.
#[derive(Debug, Clone, Deserialize)]
pub struct BanditResult {
    pub filename: String,

    /// Native severity: HIGH / MEDIUM / LOW.
    pub issue_severity: String,

    pub issue_text: String,

    pub line_number: u32,

    /// 0-based column offset; absent in older Bandit releases.
    #[serde(default)]
    pub col_offset: Option<u32>,

    /// Rule id, e.g. `B105`.
    pub test_id: String,

    /// Annotated source lines around the finding.
    #[serde(default)]
    pub code: Option<String>,
}

/// A per-file error Bandit reports alongside its results.
#[derive(Debug, Clone, Deserialize)]
pub struct BanditError {
    pub filename: String,
    pub reason: String,
}

/// Parse the full report document.
pub fn parse_report(stdout: &str) -> Result<BanditReport, serde_json::Error> {
    serde_json::from_str(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "errors": [{"filename": "bad.py", "reason": "syntax error while parsing AST"}],
        "results": [
            {
                "filename": "b.py",
                "issue_severity": "HIGH",
                "issue_confidence": "MEDIUM",
                "issue_text": "Possible hardcoded password: 'hunter2'",
                "line_number": 12,
                "col_offset": 11,
                "test_id": "B105",
                "test_name": "hardcoded_password_string",
                "code": "11 def login():\n12     password = 'hunter2'\n13     return password\n"
            }
        ]
    }"#;

    #[test]
    fn test_parse_report() {
        let report = parse_report(REPORT).unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].test_id, "B105");
        assert_eq!(report.results[0].line_number, 12);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_parse_report_missing_col_offset() {
        let doc = r#"{"results": [{"filename": "a.py", "issue_severity": "LOW", "issue_text": "x", "line_number": 1, "test_id": "B101"}]}"#;
        let report = parse_report(doc).unwrap();
        assert_eq!(report.results[0].col_offset, None);
    }
}
