//! Cache persistence.

use crate::types::{CacheState, DEFAULT_MAX_AGE_DAYS};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed storage for the result cache.
pub struct CacheStore {
    path: Utf8PathBuf,
    max_age_days: i64,
}

impl CacheStore {
    /// Create a store rooted at the given cache directory.
    ///
    /// State lives at `<cache_dir>/cache.json`.
    pub fn new(cache_dir: &Utf8Path) -> Self {
        Self {
            path: cache_dir.join("cache.json"),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }

    pub fn with_max_age_days(mut self, days: i64) -> Self {
        self.max_age_days = days;
        self
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Load cache state from disk, dropping stale entries.
    ///
    /// Returns an empty state if the file doesn't exist.
    pub fn load(&self) -> Result<CacheState, StoreError> {
        if !self.path.exists() {
            return Ok(CacheState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let mut state: CacheState = serde_json::from_str(&content)?;
        state.evict_older_than(self.max_age_days);
        Ok(state)
    }

    /// Save cache state to disk, creating parent directories if needed.
    pub fn save(&self, state: &CacheState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(state)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::content_hash;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(Utf8Path::from_path(temp.path()).unwrap());
        let state = store.load().unwrap();
        assert!(state.entries.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(Utf8Path::from_path(temp.path()).unwrap());

        let mut state = CacheState::default();
        state.insert("patterns", &content_hash(b"abc"), Vec::new());
        store.save(&state).unwrap();
        assert!(store.path().exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.entries.len(), 1);
    }

    #[test]
    fn test_load_evicts_stale() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(Utf8Path::from_path(temp.path()).unwrap());

        let mut state = CacheState::default();
        let hash = content_hash(b"abc");
        state.insert("patterns", &hash, Vec::new());
        state
            .entries
            .values_mut()
            .for_each(|e| e.stored_at = chrono::Utc::now() - chrono::Duration::days(30));
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.entries.is_empty());
    }
}
