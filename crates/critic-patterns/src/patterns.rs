//! The built-in pattern table.

use critic_core::{Category, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

static DEBUG_PRINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\bconsole\.(?:log|debug|trace)\s*\(|^\s*debugger\b|\bdbg!\s*\()").unwrap()
});

static TODO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:#|//|/\*|<!--|;;)\s*(?i:TODO|FIXME|XXX)\b").unwrap());

static SECRET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:password|passwd|secret|api_key|apikey|auth_token|access_token|private_key)\b\s*[:=]\s*["'][^"']{4,}["']"#,
    )
    .unwrap()
});

/// One entry of the pattern table.
#[derive(Debug)]
pub struct PatternRule {
    /// Rule identifier carried onto produced issues.
    pub rule: &'static str,
    pub severity: Severity,
    pub category: Category,
    /// Message for every match of this pattern.
    pub message: &'static str,
    regex: &'static Lazy<Regex>,
}

impl PatternRule {
    /// Byte offset of the first match in `line`, if any.
    pub fn find(&self, line: &str) -> Option<usize> {
        self.regex.find(line).map(|m| m.start())
    }
}

static PATTERNS: &[PatternRule] = &[
    PatternRule {
        rule: "debug-print",
        severity: Severity::Low,
        category: Category::Quality,
        message: "Debug print left in code",
        regex: &DEBUG_PRINT_RE,
    },
    PatternRule {
        rule: "todo-comment",
        severity: Severity::Low,
        category: Category::Quality,
        message: "Unresolved TODO marker",
        regex: &TODO_RE,
    },
    PatternRule {
        rule: "hardcoded-secret",
        severity: Severity::Critical,
        category: Category::Security,
        message: "Possible hardcoded secret",
        regex: &SECRET_RE,
    },
];

/// The fixed pattern table.
pub fn builtin_patterns() -> &'static [PatternRule] {
    PATTERNS
}
