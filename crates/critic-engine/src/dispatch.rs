//! Driver dispatch.

use crate::config::EngineConfig;
use camino::{Utf8Path, Utf8PathBuf};
use critic_core::{AnalyzerKind, DriverReport};
use tokio::sync::watch;

/// Invoke the driver for one analyzer on one batch of files.
///
/// Drivers are pure with respect to the job: they take a batch, return a
/// report, and touch no shared state.
pub(crate) async fn run_batch(
    analyzer: AnalyzerKind,
    project_root: &Utf8Path,
    files: &[Utf8PathBuf],
    config: &EngineConfig,
    mut cancel: watch::Receiver<bool>,
) -> DriverReport {
    tracing::debug!("dispatching {} file(s) to {analyzer}", files.len());
    match analyzer {
        AnalyzerKind::Eslint => {
            critic_eslint::analyze(project_root, files, &config.eslint, &mut cancel).await
        }
        AnalyzerKind::Bandit => {
            critic_bandit::analyze(project_root, files, &config.bandit, &mut cancel).await
        }
        AnalyzerKind::Patterns => critic_patterns::analyze(project_root, files, &mut cancel).await,
    }
}
