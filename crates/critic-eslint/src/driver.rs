//! ESLint driver: invocation and normalization.

use crate::report::{parse_report, snippet_from_source, EslintMessage};
use crate::rules::category_for_rule;
use camino::{Utf8Path, Utf8PathBuf};
use critic_core::{AnalyzerKind, DriverReport, DriverWarning, Issue, Severity, WarningKind};
use critic_parsers::{run_tool, strip_root, truncate_snippet, CommandError, DEFAULT_GRACE};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::watch;

/// ESLint invocation settings.
#[derive(Debug, Clone)]
pub struct EslintConfig {
    /// Executable name or explicit path.
    pub binary: String,
    /// Per-batch deadline.
    pub deadline: Duration,
    /// Termination grace window.
    pub grace: Duration,
}

impl Default for EslintConfig {
    fn default() -> Self {
        Self {
            binary: "eslint".to_string(),
            deadline: Duration::from_secs(60),
            grace: DEFAULT_GRACE,
        }
    }
}

/// Run ESLint on a batch of files and normalize its findings.
///
/// Tool-level trouble (missing binary, timeout, unparseable output) comes
/// back as warnings in the report, never as an error.
pub async fn analyze(
    project_root: &Utf8Path,
    files: &[Utf8PathBuf],
    config: &EslintConfig,
    cancel: &mut watch::Receiver<bool>,
) -> DriverReport {
    let mut cmd = Command::new(&config.binary);
    cmd.current_dir(project_root.as_std_path());
    cmd.args(["--format", "json", "--no-color"]);
    for file in files {
        cmd.arg(file.as_str());
    }

    // ESLint exits 1 when it finds problems; that is a successful run.
    let output = match run_tool(cmd, "eslint", config.deadline, config.grace, cancel).await {
        Ok(output) => output,
        Err(CommandError::Spawn { error, .. }) => {
            return DriverReport::from_warning(DriverWarning::new(
                AnalyzerKind::Eslint,
                WarningKind::MissingBinary,
                format!("could not spawn eslint ({error})"),
            ));
        }
        Err(CommandError::Timeout { seconds, .. }) => {
            return DriverReport::from_warning(DriverWarning::new(
                AnalyzerKind::Eslint,
                WarningKind::Timeout,
                format!("eslint batch of {} file(s) timed out after {seconds}s", files.len()),
            ));
        }
        Err(CommandError::Cancelled { .. }) => {
            tracing::debug!("eslint batch cancelled");
            return DriverReport::default();
        }
        Err(CommandError::Wait { error, .. }) => {
            return DriverReport::from_warning(DriverWarning::new(
                AnalyzerKind::Eslint,
                WarningKind::ToolError,
                format!("eslint did not finish cleanly: {error}"),
            ));
        }
    };

    let parsed = match parse_report(&output.stdout) {
        Ok(parsed) => parsed,
        Err(e) => {
            // Exit >= 2 means ESLint itself failed (bad config, OOM); the
            // stderr tail is the useful part then.
            let warning = if output.exit_code >= 2 {
                DriverWarning::new(
                    AnalyzerKind::Eslint,
                    WarningKind::ToolError,
                    format!(
                        "eslint exited {}: {}",
                        output.exit_code,
                        truncate_snippet(output.stderr.trim(), 200)
                    ),
                )
            } else {
                DriverWarning::new(
                    AnalyzerKind::Eslint,
                    WarningKind::ParseFailure,
                    format!("unparseable eslint report: {e}"),
                )
            };
            return DriverReport::from_warning(warning);
        }
    };

    let mut report = DriverReport::default();
    for file in parsed {
        let rel = strip_root(&file.file_path, project_root);
        for msg in &file.messages {
            report.issues.push(normalize(msg, &rel, file.source.as_deref()));
        }
    }
    report
}

fn normalize(msg: &EslintMessage, file: &Utf8Path, source: Option<&str>) -> Issue {
    let severity = match msg.severity {
        2 => Severity::High,
        1 => Severity::Medium,
        _ => Severity::Low,
    };
    let rule = msg.rule_id.clone().unwrap_or_else(|| "fatal".to_string());
    let line = msg.line.unwrap_or(0);
    let snippet = source.and_then(|src| snippet_from_source(src, line));

    Issue {
        id: String::new(),
        file: file.to_path_buf(),
        line,
        column: msg.column.unwrap_or(0),
        severity,
        category: category_for_rule(&rule),
        rule,
        message: msg.message.clone(),
        snippet,
        analyzer: AnalyzerKind::Eslint.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critic_core::Category;

    fn message(rule: Option<&str>, severity: u8, line: u32) -> EslintMessage {
        EslintMessage {
            rule_id: rule.map(|r| r.to_string()),
            severity,
            message: "test".to_string(),
            line: Some(line),
            column: Some(4),
        }
    }

    #[test]
    fn test_normalize_severity_mapping() {
        let file = Utf8Path::new("a.js");
        let high = normalize(&message(Some("no-unused-vars"), 2, 3), file, None);
        assert_eq!(high.severity, Severity::High);
        let medium = normalize(&message(Some("eqeqeq"), 1, 7), file, None);
        assert_eq!(medium.severity, Severity::Medium);
    }

    #[test]
    fn test_normalize_category() {
        let file = Utf8Path::new("a.js");
        let sec = normalize(&message(Some("security/detect-object-injection"), 2, 1), file, None);
        assert_eq!(sec.category, Category::Security);
        let perf = normalize(&message(Some("no-await-in-loop"), 1, 1), file, None);
        assert_eq!(perf.category, Category::Performance);
    }

    #[test]
    fn test_normalize_fatal_message() {
        let file = Utf8Path::new("a.js");
        let issue = normalize(&message(None, 2, 0), file, None);
        assert_eq!(issue.rule, "fatal");
        assert_eq!(issue.line, 0);
        assert!(issue.snippet.is_none());
    }

    #[test]
    fn test_normalize_snippet() {
        let file = Utf8Path::new("a.js");
        let issue = normalize(
            &message(Some("no-console"), 1, 2),
            file,
            Some("first\nconsole.log('x');\n"),
        );
        assert_eq!(issue.snippet.as_deref(), Some("console.log('x');"));
    }

    #[tokio::test]
    async fn test_analyze_missing_binary() {
        let config = EslintConfig {
            binary: "eslint-binary-that-does-not-exist".to_string(),
            ..EslintConfig::default()
        };
        let (_tx, mut rx) = watch::channel(false);
        let report = analyze(
            Utf8Path::new("/tmp"),
            &[Utf8PathBuf::from("a.js")],
            &config,
            &mut rx,
        )
        .await;
        assert!(report.issues.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::MissingBinary);
    }
}
