//! File-to-analyzer routing.

use camino::Utf8Path;
use critic_core::AnalyzerKind;

/// The subset of enabled analyzers that accept this file.
///
/// Pure over the descriptor data: lowercase extension only, the file is
/// never opened. Used at plan time to fix `total_units` and again at
/// dispatch time to route batches; both calls see the same answer.
pub fn classify(path: &Utf8Path, enabled: &[AnalyzerKind]) -> Vec<AnalyzerKind> {
    enabled
        .iter()
        .copied()
        .filter(|analyzer| analyzer.accepts(path))
        .collect()
}
