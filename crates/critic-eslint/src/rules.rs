//! Rule-id to category mapping.

use critic_core::Category;

/// Prefix used by the security plugin's rules (`security/detect-...`).
const SECURITY_PLUGIN_PREFIX: &str = "security/";

/// Core rules that flag performance hazards rather than style.
const PERFORMANCE_RULES: &[&str] = &[
    "no-await-in-loop",
    "no-async-promise-executor",
    "require-atomic-updates",
    "no-inner-declarations",
];

/// Map an ESLint rule id to a normalized category.
///
/// The default bucket is `quality`; only the security plugin and a short
/// list of performance rules map elsewhere.
pub fn category_for_rule(rule_id: &str) -> Category {
    if rule_id.starts_with(SECURITY_PLUGIN_PREFIX) {
        return Category::Security;
    }
    if PERFORMANCE_RULES.contains(&rule_id) {
        return Category::Performance;
    }
    Category::Quality
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_plugin_rules() {
        assert_eq!(
            category_for_rule("security/detect-eval-with-expression"),
            Category::Security
        );
    }

    #[test]
    fn test_performance_rules() {
        assert_eq!(category_for_rule("no-await-in-loop"), Category::Performance);
    }

    #[test]
    fn test_default_is_quality() {
        assert_eq!(category_for_rule("no-unused-vars"), Category::Quality);
        assert_eq!(category_for_rule("eqeqeq"), Category::Quality);
    }
}
