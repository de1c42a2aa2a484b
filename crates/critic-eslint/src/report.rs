//! ESLint JSON report parsing.

use serde::Deserialize;

/// One entry of `eslint --format json` output (one per linted file).
#[derive(Debug, Clone, Deserialize)]
pub struct EslintFile {
    #[serde(rename = "filePath")]
    pub file_path: String,

    pub messages: Vec<EslintMessage>,

    /// Full file contents; present when ESLint decides to include it
    /// (fatal errors, some formatters). Used for snippets when available.
    #[serde(default)]
    pub source: Option<String>,
}

/// A single lint message.
#[derive(Debug, Clone, Deserialize)]
pub struct EslintMessage {
    /// Rule id, absent for fatal (parse-level) messages.
    #[serde(rename = "ruleId")]
    pub rule_id: Option<String>,

    /// Native severity: 2 = error, 1 = warning.
    pub severity: u8,

    pub message: String,

    /// 1-based line; fatal messages can omit it.
    #[serde(default)]
    pub line: Option<u32>,

    /// 1-based column.
    #[serde(default)]
    pub column: Option<u32>,
}

/// Parse the full report document.
pub fn parse_report(stdout: &str) -> Result<Vec<EslintFile>, serde_json::Error> {
    serde_json::from_str(stdout)
}

/// Pull the offending line out of the file source for a snippet.
pub fn snippet_from_source(source: &str, line: u32) -> Option<String> {
    if line == 0 {
        return None;
    }
    source
        .lines()
        .nth(line as usize - 1)
        .map(|l| critic_parsers::truncate_snippet(l, 200))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"[
        {
            "filePath": "/p/a.js",
            "messages": [
                {"ruleId": "no-unused-vars", "severity": 2, "message": "'x' is defined but never used.", "line": 3, "column": 7},
                {"ruleId": "eqeqeq", "severity": 1, "message": "Expected '===' and instead saw '=='.", "line": 7, "column": 10}
            ],
            "errorCount": 1,
            "warningCount": 1,
            "source": "line one\nline two\nvar x = 1;\n"
        }
    ]"#;

    #[test]
    fn test_parse_report() {
        let files = parse_report(REPORT).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].messages.len(), 2);
        assert_eq!(files[0].messages[0].rule_id.as_deref(), Some("no-unused-vars"));
        assert_eq!(files[0].messages[0].severity, 2);
        assert_eq!(files[0].messages[1].line, Some(7));
    }

    #[test]
    fn test_parse_report_fatal_message() {
        let doc = r#"[{"filePath": "/p/b.js", "messages": [{"ruleId": null, "severity": 2, "message": "Parsing error: Unexpected token"}]}]"#;
        let files = parse_report(doc).unwrap();
        assert!(files[0].messages[0].rule_id.is_none());
        assert_eq!(files[0].messages[0].line, None);
    }

    #[test]
    fn test_snippet_from_source() {
        assert_eq!(
            snippet_from_source("a\nb\nc\n", 2).as_deref(),
            Some("b")
        );
        assert_eq!(snippet_from_source("a\n", 5), None);
        assert_eq!(snippet_from_source("a\n", 0), None);
    }
}
