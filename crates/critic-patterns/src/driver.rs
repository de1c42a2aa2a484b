//! Pattern driver: file scanning and normalization.

use crate::patterns::builtin_patterns;
use camino::{Utf8Path, Utf8PathBuf};
use critic_core::{AnalyzerKind, DriverReport, DriverWarning, Issue, WarningKind};
use critic_parsers::truncate_snippet;
use tokio::sync::watch;

/// Lines longer than this are skipped; they are minified bundles or
/// generated blobs, not code anyone reviews.
const MAX_LINE_LEN: usize = 500;

/// Scan a batch of files against the built-in pattern table.
///
/// Unreadable files produce a warning and are skipped; files that turn
/// out to contain binary data are skipped quietly.
pub async fn analyze(
    project_root: &Utf8Path,
    files: &[Utf8PathBuf],
    cancel: &mut watch::Receiver<bool>,
) -> DriverReport {
    let mut report = DriverReport::default();

    for file in files {
        if *cancel.borrow() {
            tracing::debug!("pattern scan cancelled");
            break;
        }

        let abs = project_root.join(file);
        let bytes = match tokio::fs::read(abs.as_std_path()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                report.warnings.push(
                    DriverWarning::new(
                        AnalyzerKind::Patterns,
                        WarningKind::UnreadableFile,
                        format!("could not read {file}: {e}"),
                    )
                    .with_file(file.clone()),
                );
                continue;
            }
        };
        if bytes.contains(&0) {
            tracing::debug!("skipping binary content in {file}");
            continue;
        }

        let content = String::from_utf8_lossy(&bytes);
        scan_lines(&content, file, &mut report.issues);
    }

    report
}

fn scan_lines(content: &str, file: &Utf8Path, issues: &mut Vec<Issue>) {
    for (idx, line) in content.lines().enumerate() {
        if line.len() > MAX_LINE_LEN {
            continue;
        }
        for pattern in builtin_patterns() {
            if let Some(offset) = pattern.find(line) {
                issues.push(Issue {
                    id: String::new(),
                    file: file.to_path_buf(),
                    line: idx as u32 + 1,
                    column: offset as u32 + 1,
                    severity: pattern.severity,
                    category: pattern.category,
                    rule: pattern.rule.to_string(),
                    message: pattern.message.to_string(),
                    snippet: Some(truncate_snippet(line.trim_start(), 200)),
                    analyzer: AnalyzerKind::Patterns.name().to_string(),
                });
            }
        }
    }
}
