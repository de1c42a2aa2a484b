//! Plan construction: from a fileset to per-analyzer batch lanes.

use crate::classify::classify;
use camino::Utf8PathBuf;
use critic_core::{AnalyzerKind, DriverWarning, WarningKind};
use critic_state::ReviewInput;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("project root {0} is not a readable directory")]
    RootUnreadable(Utf8PathBuf),
}

/// All batches for one analyzer, in submission order.
///
/// A lane's batches are dispatched sequentially so that, within one
/// analyzer, issues from earlier files land before issues from later
/// ones. Lanes of different analyzers run concurrently.
#[derive(Debug, Clone)]
pub struct Lane {
    pub analyzer: AnalyzerKind,
    pub batches: Vec<Vec<Utf8PathBuf>>,
}

/// The fixed multiset of work units for one job, grouped for dispatch.
#[derive(Debug)]
pub struct Plan {
    /// One unit per `(file, analyzer)` pair.
    pub total_units: usize,
    pub lanes: Vec<Lane>,
    /// Plan-time trouble: files in the input that do not exist.
    pub warnings: Vec<DriverWarning>,
}

/// Build the work plan for a job.
///
/// Nonexistent files are tolerated: skipped with a per-file warning and
/// left out of the unit count. Files no enabled analyzer accepts simply
/// contribute zero units.
pub fn build(input: &ReviewInput, batch_size: usize) -> Result<Plan, PlanError> {
    if !input.project_root.as_std_path().is_dir() {
        return Err(PlanError::RootUnreadable(input.project_root.clone()));
    }

    let batch_size = batch_size.max(1);
    let mut warnings = Vec::new();
    let mut per_analyzer: Vec<(AnalyzerKind, Vec<Utf8PathBuf>)> = input
        .analyzers
        .iter()
        .map(|a| (*a, Vec::new()))
        .collect();
    let mut total_units = 0;

    for file in &input.files {
        if !input.project_root.join(file).as_std_path().exists() {
            warnings.push(DriverWarning::planner(
                WarningKind::UnreadableFile,
                format!("{file} does not exist; skipped"),
            ));
            continue;
        }
        for analyzer in classify(file, &input.analyzers) {
            if let Some((_, files)) = per_analyzer.iter_mut().find(|(a, _)| *a == analyzer) {
                files.push(file.clone());
                total_units += 1;
            }
        }
    }

    let lanes = per_analyzer
        .into_iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(analyzer, files)| Lane {
            analyzer,
            batches: files.chunks(batch_size).map(|c| c.to_vec()).collect(),
        })
        .collect();

    Ok(Plan {
        total_units,
        lanes,
        warnings,
    })
}
