//! Bandit driver: invocation and normalization.

use crate::report::{parse_report, BanditResult};
use camino::{Utf8Path, Utf8PathBuf};
use critic_core::{AnalyzerKind, Category, DriverReport, DriverWarning, Issue, Severity, WarningKind};
use critic_parsers::{run_tool, strip_root, truncate_snippet, CommandError, DEFAULT_GRACE};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::watch;

/// Bandit invocation settings.
#[derive(Debug, Clone)]
pub struct BanditConfig {
    /// Executable name or explicit path.
    pub binary: String,
    /// Per-batch deadline.
    pub deadline: Duration,
    /// Termination grace window.
    pub grace: Duration,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            binary: "bandit".to_string(),
            deadline: Duration::from_secs(60),
            grace: DEFAULT_GRACE,
        }
    }
}

/// Run Bandit on a batch of files and normalize its findings.
pub async fn analyze(
    project_root: &Utf8Path,
    files: &[Utf8PathBuf],
    config: &BanditConfig,
    cancel: &mut watch::Receiver<bool>,
) -> DriverReport {
    let mut cmd = Command::new(&config.binary);
    cmd.current_dir(project_root.as_std_path());
    cmd.args(["--format", "json", "-q"]);
    for file in files {
        cmd.arg(file.as_str());
    }

    // Bandit exits 1 when it reports findings; that is a successful run.
    let output = match run_tool(cmd, "bandit", config.deadline, config.grace, cancel).await {
        Ok(output) => output,
        Err(CommandError::Spawn { error, .. }) => {
            return DriverReport::from_warning(DriverWarning::new(
                AnalyzerKind::Bandit,
                WarningKind::MissingBinary,
                format!("could not spawn bandit ({error})"),
            ));
        }
        Err(CommandError::Timeout { seconds, .. }) => {
            return DriverReport::from_warning(DriverWarning::new(
                AnalyzerKind::Bandit,
                WarningKind::Timeout,
                format!("bandit batch of {} file(s) timed out after {seconds}s", files.len()),
            ));
        }
        Err(CommandError::Cancelled { .. }) => {
            tracing::debug!("bandit batch cancelled");
            return DriverReport::default();
        }
        Err(CommandError::Wait { error, .. }) => {
            return DriverReport::from_warning(DriverWarning::new(
                AnalyzerKind::Bandit,
                WarningKind::ToolError,
                format!("bandit did not finish cleanly: {error}"),
            ));
        }
    };

    let parsed = match parse_report(&output.stdout) {
        Ok(parsed) => parsed,
        Err(e) => {
            let warning = if output.exit_code >= 2 {
                DriverWarning::new(
                    AnalyzerKind::Bandit,
                    WarningKind::ToolError,
                    format!(
                        "bandit exited {}: {}",
                        output.exit_code,
                        truncate_snippet(output.stderr.trim(), 200)
                    ),
                )
            } else {
                DriverWarning::new(
                    AnalyzerKind::Bandit,
                    WarningKind::ParseFailure,
                    format!("unparseable bandit report: {e}"),
                )
            };
            return DriverReport::from_warning(warning);
        }
    };

    let mut report = DriverReport::default();
    for err in &parsed.errors {
        report.warnings.push(
            DriverWarning::new(AnalyzerKind::Bandit, WarningKind::ToolError, err.reason.clone())
                .with_file(strip_root(&err.filename, project_root)),
        );
    }
    for result in &parsed.results {
        report.issues.push(normalize(result, project_root));
    }
    report
}

fn normalize(result: &BanditResult, project_root: &Utf8Path) -> Issue {
    let severity = match result.issue_severity.to_uppercase().as_str() {
        "HIGH" => Severity::Critical,
        "MEDIUM" => Severity::High,
        _ => Severity::Medium,
    };

    Issue {
        id: String::new(),
        file: strip_root(&result.filename, project_root),
        line: result.line_number,
        column: result.col_offset.map(|c| c + 1).unwrap_or(0),
        severity,
        category: Category::Security,
        rule: result.test_id.clone(),
        message: result.issue_text.clone(),
        snippet: result
            .code
            .as_deref()
            .map(|code| truncate_snippet(code, 300)),
        analyzer: AnalyzerKind::Bandit.name().to_string(),
    }
}
