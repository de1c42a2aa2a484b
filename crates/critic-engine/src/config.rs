//! Engine configuration.

use camino::Utf8PathBuf;
use critic_bandit::BanditConfig;
use critic_eslint::EslintConfig;

/// How many analyzer batches may run at once per job.
pub const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 2;

/// Cap on files per batch regardless of CPU count; keeps command lines
/// and tool memory bounded.
const MAX_BATCH_SIZE: usize = 32;

/// Settings for the whole engine; shared by every job a registry runs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Concurrent analyzer batches per job.
    pub max_concurrent_batches: usize,

    /// Files per driver batch.
    pub batch_size: usize,

    pub eslint: EslintConfig,
    pub bandit: BanditConfig,

    /// Enable the on-disk result cache rooted here.
    pub cache_dir: Option<Utf8PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
            batch_size: default_batch_size(),
            eslint: EslintConfig::default(),
            bandit: BanditConfig::default(),
            cache_dir: None,
        }
    }
}

fn default_batch_size() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    (cpus * 4).min(MAX_BATCH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_bounded() {
        let config = EngineConfig::default();
        assert!(config.batch_size >= 1);
        assert!(config.batch_size <= MAX_BATCH_SIZE);
        assert_eq!(config.max_concurrent_batches, 2);
        assert!(config.cache_dir.is_none());
    }
}
