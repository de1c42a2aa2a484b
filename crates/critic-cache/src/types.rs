//! Cache entry and in-memory cache state.

use chrono::{DateTime, Utc};
use critic_core::Issue;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Entries older than this many days are invalidated.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Hex sha256 of file contents.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Normalized issues one analyzer produced for one file content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub analyzer: String,
    pub content_hash: String,
    pub stored_at: DateTime<Utc>,
    /// Issue ids are job-scoped and therefore stored empty; the executor
    /// reassigns them on replay.
    pub issues: Vec<Issue>,
}

/// The whole cache document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheState {
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheState {
    fn key(analyzer: &str, hash: &str) -> String {
        format!("{analyzer}:{hash}")
    }

    pub fn lookup(&self, analyzer: &str, hash: &str) -> Option<&CacheEntry> {
        self.entries.get(&Self::key(analyzer, hash))
    }

    pub fn insert(&mut self, analyzer: &str, hash: &str, issues: Vec<Issue>) {
        let mut issues = issues;
        for issue in &mut issues {
            issue.id = String::new();
        }
        self.entries.insert(
            Self::key(analyzer, hash),
            CacheEntry {
                analyzer: analyzer.to_string(),
                content_hash: hash.to_string(),
                stored_at: Utc::now(),
                issues,
            },
        );
    }

    /// Drop entries stored before the horizon. Returns how many went.
    pub fn evict_older_than(&mut self, max_age_days: i64) -> usize {
        let horizon = Utc::now() - chrono::Duration::days(max_age_days);
        let before = self.entries.len();
        self.entries.retain(|_, e| e.stored_at >= horizon);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable() {
        let a = content_hash(b"hello");
        let b = content_hash(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_hash(b"hello "));
    }

    #[test]
    fn test_lookup_roundtrip() {
        let mut state = CacheState::default();
        let hash = content_hash(b"content");
        assert!(state.lookup("eslint", &hash).is_none());
        state.insert("eslint", &hash, Vec::new());
        assert!(state.lookup("eslint", &hash).is_some());
        // Same hash under a different analyzer is a distinct key.
        assert!(state.lookup("bandit", &hash).is_none());
    }

    #[test]
    fn test_eviction() {
        let mut state = CacheState::default();
        let hash = content_hash(b"old");
        state.insert("eslint", &hash, Vec::new());
        state
            .entries
            .get_mut(&format!("eslint:{hash}"))
            .unwrap()
            .stored_at = Utc::now() - chrono::Duration::days(8);
        state.insert("eslint", &content_hash(b"fresh"), Vec::new());

        let evicted = state.evict_older_than(DEFAULT_MAX_AGE_DAYS);
        assert_eq!(evicted, 1);
        assert_eq!(state.entries.len(), 1);
    }
}
