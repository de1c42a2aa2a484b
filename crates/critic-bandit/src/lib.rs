//! Bandit integration for critic.
//!
//! Runs the Bandit security scanner over a batch of Python files and
//! maps its JSON report to the normalized issue model. Every Bandit
//! finding is a `security` issue.

pub mod driver;
pub mod report;

pub use driver::{analyze, BanditConfig};
pub use report::{parse_report, BanditReport, BanditResult};
