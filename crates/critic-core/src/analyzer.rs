//! Analyzer descriptors.
//!
//! Static metadata for the built-in drivers: accepted extensions,
//! declared categories, and name lookup. The classifier routes files to
//! analyzers using only this descriptor data, never file contents.

use crate::issue::Category;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// Extensions the pattern driver refuses: well-known binary formats.
/// Everything else (including extensionless files) is treated as text.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svgz", "pdf", "zip", "gz", "tar", "bz2",
    "xz", "zst", "7z", "jar", "war", "exe", "dll", "so", "dylib", "a", "o", "class", "pyc", "pyo",
    "wasm", "bin", "dat", "db", "sqlite", "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4",
    "avi", "mov", "ogg", "wav",
];

/// Built-in analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// JS/TS linting via ESLint.
    Eslint,
    /// Python security scanning via Bandit.
    Bandit,
    /// Built-in regex pattern checks.
    Patterns,
}

impl AnalyzerKind {
    pub const ALL: [AnalyzerKind; 3] = [
        AnalyzerKind::Eslint,
        AnalyzerKind::Bandit,
        AnalyzerKind::Patterns,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Eslint => "eslint",
            Self::Bandit => "bandit",
            Self::Patterns => "patterns",
        }
    }

    /// Parse an analyzer name as it appears in job input.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "eslint" => Some(Self::Eslint),
            "bandit" => Some(Self::Bandit),
            "patterns" => Some(Self::Patterns),
            _ => None,
        }
    }

    /// Categories this analyzer can emit.
    pub fn categories(&self) -> &'static [Category] {
        match self {
            Self::Eslint => &[Category::Quality, Category::Security, Category::Performance],
            Self::Bandit => &[Category::Security],
            Self::Patterns => &[Category::Quality, Category::Security],
        }
    }

    /// Whether this analyzer accepts the given file.
    ///
    /// Decided from the lowercase extension only; the file is never opened.
    pub fn accepts(&self, path: &Utf8Path) -> bool {
        let ext = extension_lowercase(path);
        match self {
            Self::Eslint => matches!(ext.as_deref(), Some("js" | "jsx" | "ts" | "tsx")),
            Self::Bandit => ext.as_deref() == Some("py"),
            Self::Patterns => match ext.as_deref() {
                Some(ext) => !BINARY_EXTENSIONS.contains(&ext),
                None => true,
            },
        }
    }
}

impl std::fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn extension_lowercase(path: &Utf8Path) -> Option<String> {
    path.extension().map(|e| e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eslint_accepts_js_family() {
        for file in ["a.js", "b.jsx", "c.ts", "d.TSX"] {
            assert!(AnalyzerKind::Eslint.accepts(Utf8Path::new(file)), "{file}");
        }
        assert!(!AnalyzerKind::Eslint.accepts(Utf8Path::new("a.py")));
        assert!(!AnalyzerKind::Eslint.accepts(Utf8Path::new("a.json")));
    }

    #[test]
    fn test_bandit_accepts_python_only() {
        assert!(AnalyzerKind::Bandit.accepts(Utf8Path::new("x.py")));
        assert!(!AnalyzerKind::Bandit.accepts(Utf8Path::new("x.pyc")));
        assert!(!AnalyzerKind::Bandit.accepts(Utf8Path::new("x.js")));
    }

    #[test]
    fn test_patterns_rejects_binary() {
        assert!(AnalyzerKind::Patterns.accepts(Utf8Path::new("notes.md")));
        assert!(AnalyzerKind::Patterns.accepts(Utf8Path::new("Makefile")));
        assert!(!AnalyzerKind::Patterns.accepts(Utf8Path::new("logo.PNG")));
        assert!(!AnalyzerKind::Patterns.accepts(Utf8Path::new("lib.so")));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(AnalyzerKind::from_name("eslint"), Some(AnalyzerKind::Eslint));
        assert_eq!(AnalyzerKind::from_name("Bandit"), Some(AnalyzerKind::Bandit));
        assert_eq!(AnalyzerKind::from_name("pylint"), None);
    }
}
