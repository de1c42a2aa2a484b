//! Engine-side cache handle.
//!
//! Wraps the on-disk store in an in-memory state shared by every job a
//! registry runs. Cache trouble is never fatal: load and save failures
//! degrade to log warnings and the engine proceeds uncached.

use camino::{Utf8Path, Utf8PathBuf};
use critic_cache::{content_hash, CacheState, CacheStore};
use critic_core::{AnalyzerKind, Issue};
use tokio::sync::Mutex;

pub struct CacheHandle {
    store: CacheStore,
    state: Mutex<CacheState>,
}

impl CacheHandle {
    /// Load the cache rooted at `cache_dir`; an unreadable cache starts
    /// empty.
    pub fn load(cache_dir: &Utf8Path) -> Self {
        let store = CacheStore::new(cache_dir);
        let state = match store.load() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("could not load result cache from {}: {e}", store.path());
                CacheState::default()
            }
        };
        Self {
            store,
            state: Mutex::new(state),
        }
    }

    /// Hash a file's current contents; None when it cannot be read.
    pub async fn hash_file(&self, project_root: &Utf8Path, file: &Utf8Path) -> Option<String> {
        let abs = project_root.join(file);
        match tokio::fs::read(abs.as_std_path()).await {
            Ok(bytes) => Some(content_hash(&bytes)),
            Err(_) => None,
        }
    }

    /// Replay cached issues for `(analyzer, hash)`, rebased onto the
    /// current file path.
    pub async fn lookup(
        &self,
        analyzer: AnalyzerKind,
        hash: &str,
        file: &Utf8Path,
    ) -> Option<Vec<Issue>> {
        let state = self.state.lock().await;
        state.lookup(analyzer.name(), hash).map(|entry| {
            entry
                .issues
                .iter()
                .cloned()
                .map(|mut issue| {
                    issue.file = file.to_path_buf();
                    issue
                })
                .collect()
        })
    }

    pub async fn insert(&self, analyzer: AnalyzerKind, hash: &str, issues: Vec<Issue>) {
        let mut state = self.state.lock().await;
        state.insert(analyzer.name(), hash, issues);
    }

    /// Write the cache back to disk.
    pub async fn persist(&self) {
        let state = self.state.lock().await;
        if let Err(e) = self.store.save(&state) {
            tracing::warn!("could not persist result cache to {}: {e}", self.store.path());
        }
    }
}

/// Hits, misses, and the hashes misses will be stored under.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    /// `(file, cached issues)` in batch order.
    pub hits: Vec<(Utf8PathBuf, Vec<Issue>)>,
    /// Files the driver still has to run on, in batch order.
    pub misses: Vec<Utf8PathBuf>,
    /// Hash per miss file, for the store-back after the run.
    pub hashes: Vec<(Utf8PathBuf, String)>,
}

/// Split a batch into cache hits and files that need a live run.
pub(crate) async fn partition(
    cache: &CacheHandle,
    analyzer: AnalyzerKind,
    project_root: &Utf8Path,
    files: &[Utf8PathBuf],
) -> Partition {
    let mut part = Partition::default();
    for file in files {
        match cache.hash_file(project_root, file).await {
            Some(hash) => match cache.lookup(analyzer, &hash, file).await {
                Some(issues) => part.hits.push((file.clone(), issues)),
                None => {
                    part.hashes.push((file.clone(), hash));
                    part.misses.push(file.clone());
                }
            },
            // Unreadable here; let the driver produce the warning.
            None => part.misses.push(file.clone()),
        }
    }
    part
}
