//! Shared subprocess and parsing utilities for analyzer drivers.
//!
//! Every subprocess driver funnels its tool invocation through
//! [`run_tool`] so deadline, cancellation, and termination behavior are
//! identical across analyzers.

pub mod command;

pub use command::{run_tool, CommandError, ToolOutput, DEFAULT_GRACE};

use camino::{Utf8Path, Utf8PathBuf};

/// Make a tool-reported path project-relative.
///
/// Tools echo paths in whatever form they were given: absolute, `./`
/// prefixed, or already relative. Anything under `root` is rebased onto
/// it; anything else is passed through unchanged.
pub fn strip_root(path: &str, root: &Utf8Path) -> Utf8PathBuf {
    let path = Utf8Path::new(path);
    if let Ok(rel) = path.strip_prefix(root) {
        return rel.to_path_buf();
    }
    match path.strip_prefix(".") {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Trim a snippet to a displayable length, marking the cut.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim_end();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{cut}…")
}
