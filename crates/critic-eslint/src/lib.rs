//! ESLint integration for critic.
//!
//! Runs ESLint over a batch of JS/TS files and maps its JSON report to
//! the normalized issue model.

pub mod driver;
pub mod report;
pub mod rules;

pub use driver::{analyze, EslintConfig};
pub use report::{parse_report, EslintFile, EslintMessage};
pub use rules::category_for_rule;
