//! The job registry.

use crate::cache::CacheHandle;
use crate::config::EngineConfig;
use crate::control::JobControl;
use crate::error::EngineError;
use crate::executor;
use critic_state::{JobState, ReviewInput, ReviewJob, ReviewResult, StatusSnapshot};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

struct JobHandle {
    job: Arc<Mutex<ReviewJob>>,
    control: JobControl,
}

/// Owns every review job in this process.
///
/// The registry is a value the caller holds; dropping it drops the job
/// records. Its map has its own guard, never held across executor code;
/// each job's record has its own mutex covering state, progress, and the
/// issue list.
pub struct ReviewRegistry {
    jobs: Mutex<HashMap<String, Arc<JobHandle>>>,
    config: Arc<EngineConfig>,
    cache: Option<Arc<CacheHandle>>,
    next_id: AtomicU64,
}

impl ReviewRegistry {
    pub fn new(config: EngineConfig) -> Self {
        let cache = config
            .cache_dir
            .as_ref()
            .map(|dir| Arc::new(CacheHandle::load(dir)));
        Self {
            jobs: Mutex::new(HashMap::new()),
            config: Arc::new(config),
            cache,
            next_id: AtomicU64::new(0),
        }
    }

    /// Validate input, store a `pending` job, and start its executor in
    /// the background. Returns immediately with the job id.
    pub async fn create(&self, input: ReviewInput) -> Result<String, EngineError> {
        let mut input = input;
        validate(&input)?;
        dedup(&mut input.analyzers);
        dedup(&mut input.categories);

        let id = format!("review-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let job = Arc::new(Mutex::new(ReviewJob::new(id.clone(), input)));
        let control = JobControl::new();
        let control_rx = control.subscribe();
        let cancel_rx = control.subscribe_cancel();
        let handle = Arc::new(JobHandle {
            job: job.clone(),
            control,
        });
        self.jobs.lock().await.insert(id.clone(), handle);

        tracing::info!("created job {id}");
        tokio::spawn(executor::run(
            job,
            self.config.clone(),
            self.cache.clone(),
            control_rx,
            cancel_rx,
        ));
        Ok(id)
    }

    /// A torn-free snapshot of the job's observable state.
    pub async fn status(&self, job_id: &str) -> Result<StatusSnapshot, EngineError> {
        let handle = self.handle(job_id).await?;
        let job = handle.job.lock().await;
        Ok(job.status_snapshot())
    }

    /// Pause dispatching. The in-flight batches finish; no subprocess is
    /// ever suspended, so pause latency is bounded by the longest one.
    pub async fn pause(&self, job_id: &str) -> Result<(), EngineError> {
        let handle = self.handle(job_id).await?;
        let mut job = handle.job.lock().await;
        if job.state != JobState::Running {
            return Err(EngineError::IllegalState {
                operation: "pause",
                state: job.state,
            });
        }
        job.transition(JobState::Paused);
        handle.control.set_pause();
        tracing::info!("paused job {job_id}");
        Ok(())
    }

    pub async fn resume(&self, job_id: &str) -> Result<(), EngineError> {
        let handle = self.handle(job_id).await?;
        let mut job = handle.job.lock().await;
        if job.state != JobState::Paused {
            return Err(EngineError::IllegalState {
                operation: "resume",
                state: job.state,
            });
        }
        job.transition(JobState::Running);
        handle.control.set_run();
        tracing::info!("resumed job {job_id}");
        Ok(())
    }

    /// Cancel a non-terminal job. Live subprocesses are terminated;
    /// issues recorded before the cancel stay readable.
    pub async fn cancel(&self, job_id: &str) -> Result<(), EngineError> {
        let handle = self.handle(job_id).await?;
        let mut job = handle.job.lock().await;
        if job.state.is_terminal() {
            return Err(EngineError::IllegalState {
                operation: "cancel",
                state: job.state,
            });
        }
        job.transition(JobState::Cancelled);
        handle.control.request_cancel();
        tracing::info!("cancelled job {job_id}");
        Ok(())
    }

    /// The full result, or `None` while the job is still in flight.
    pub async fn result(&self, job_id: &str) -> Result<Option<ReviewResult>, EngineError> {
        let handle = self.handle(job_id).await?;
        let job = handle.job.lock().await;
        Ok(job.result())
    }

    async fn handle(&self, job_id: &str) -> Result<Arc<JobHandle>, EngineError> {
        self.jobs
            .lock()
            .await
            .get(job_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(job_id.to_string()))
    }
}

fn validate(input: &ReviewInput) -> Result<(), EngineError> {
    if !input.project_root.is_absolute() {
        return Err(EngineError::IllegalInput(format!(
            "project root {} is not absolute",
            input.project_root
        )));
    }
    if !input.project_root.as_std_path().is_dir() {
        return Err(EngineError::IllegalInput(format!(
            "project root {} is not an existing directory",
            input.project_root
        )));
    }
    if input.analyzers.is_empty() {
        return Err(EngineError::IllegalInput(
            "at least one analyzer must be enabled".to_string(),
        ));
    }
    if input.categories.is_empty() {
        return Err(EngineError::IllegalInput(
            "category selection is empty".to_string(),
        ));
    }
    Ok(())
}

fn dedup<T: Copy + Eq + std::hash::Hash>(items: &mut Vec<T>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(*item));
}
