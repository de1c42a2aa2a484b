//! The per-job executor.
//!
//! One executor task owns each job: it builds the plan, dispatches
//! per-analyzer batch lanes bounded by a semaphore, folds driver reports
//! into the job under its mutex, and honors pause/cancel between
//! dispatches. It returns only once the job is terminal.

use crate::cache::{partition, CacheHandle, Partition};
use crate::config::EngineConfig;
use crate::control::{wait_for_resume, ControlSignal};
use crate::dispatch;
use crate::plan::{self, Lane};
use camino::Utf8PathBuf;
use critic_core::{Category, DriverReport, Issue};
use critic_state::{JobState, ReviewJob};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, Semaphore};
use tokio::task::JoinSet;

/// Drive a job from `pending` to a terminal state.
pub(crate) async fn run(
    job: Arc<Mutex<ReviewJob>>,
    config: Arc<EngineConfig>,
    cache: Option<Arc<CacheHandle>>,
    control: watch::Receiver<ControlSignal>,
    cancel: watch::Receiver<bool>,
) {
    if let Err(message) = drive(&job, &config, &cache, control, cancel).await {
        let mut job = job.lock().await;
        tracing::warn!("job {} failed: {message}", job.id);
        job.fail(message);
    }
    if let Some(cache) = &cache {
        cache.persist().await;
    }
    let job = job.lock().await;
    tracing::info!("job {} finished as {}", job.id, job.state);
}

async fn drive(
    job: &Arc<Mutex<ReviewJob>>,
    config: &Arc<EngineConfig>,
    cache: &Option<Arc<CacheHandle>>,
    control: watch::Receiver<ControlSignal>,
    cancel: watch::Receiver<bool>,
) -> Result<(), String> {
    let (project_root, categories, lanes) = {
        let mut job = job.lock().await;
        if !job.transition(JobState::Running) {
            // Cancelled before the executor got going.
            return Ok(());
        }
        let plan = plan::build(&job.input, config.batch_size).map_err(|e| e.to_string())?;
        tracing::info!(
            "job {}: {} unit(s) across {} analyzer lane(s)",
            job.id,
            plan.total_units,
            plan.lanes.len()
        );
        job.warnings.extend(plan.warnings);
        job.progress.begin(plan.total_units);
        (
            job.input.project_root.clone(),
            job.input.categories.clone(),
            plan.lanes,
        )
    };

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_batches.max(1)));
    let mut lanes_running = JoinSet::new();
    for lane in lanes {
        lanes_running.spawn(run_lane(LaneContext {
            lane,
            job: job.clone(),
            project_root: project_root.clone(),
            categories: categories.clone(),
            config: config.clone(),
            cache: cache.clone(),
            semaphore: semaphore.clone(),
            control: control.clone(),
            cancel: cancel.clone(),
        }));
    }
    while let Some(joined) = lanes_running.join_next().await {
        joined.map_err(|e| format!("analyzer lane task died: {e}"))?;
    }

    finish(job, control).await
}

/// Close out the job once every lane is done. A job paused with nothing
/// left in flight stays paused until resume or cancel.
async fn finish(
    job: &Arc<Mutex<ReviewJob>>,
    mut control: watch::Receiver<ControlSignal>,
) -> Result<(), String> {
    loop {
        {
            let mut job = job.lock().await;
            match job.state {
                JobState::Running => {
                    debug_assert_eq!(
                        job.progress.completed_units(),
                        job.progress.total_units()
                    );
                    job.transition(JobState::Completed);
                    return Ok(());
                }
                JobState::Paused => {}
                _ => return Ok(()),
            }
        }
        if wait_for_resume(&mut control).await == ControlSignal::Cancel {
            return Ok(());
        }
    }
}

struct LaneContext {
    lane: Lane,
    job: Arc<Mutex<ReviewJob>>,
    project_root: Utf8PathBuf,
    categories: Vec<Category>,
    config: Arc<EngineConfig>,
    cache: Option<Arc<CacheHandle>>,
    semaphore: Arc<Semaphore>,
    control: watch::Receiver<ControlSignal>,
    cancel: watch::Receiver<bool>,
}

/// Run one analyzer's batches sequentially. Sequential within the lane
/// keeps issues in submission order per analyzer; the semaphore bounds
/// how many lanes have a batch in flight at once.
async fn run_lane(mut ctx: LaneContext) {
    let analyzer = ctx.lane.analyzer;
    let batches = std::mem::take(&mut ctx.lane.batches);

    for files in batches {
        // Control check between dispatches: pause blocks here with
        // bounded latency, cancel stops the lane. A pause that lands
        // while we wait at the concurrency bound is honored too, so a
        // paused job never lets another batch slip through.
        let permit = loop {
            if wait_for_resume(&mut ctx.control).await == ControlSignal::Cancel {
                return;
            }
            let Ok(permit) = ctx.semaphore.clone().acquire_owned().await else {
                return;
            };
            match *ctx.control.borrow() {
                ControlSignal::Cancel => return,
                ControlSignal::Pause => drop(permit),
                ControlSignal::Run => break permit,
            }
        };

        {
            let mut job = ctx.job.lock().await;
            if job.state.is_terminal() {
                return;
            }
            if let Some(first) = files.first() {
                job.progress.record_unit_start(first);
            }
        }

        let part = match &ctx.cache {
            Some(cache) => partition(cache, analyzer, &ctx.project_root, &files).await,
            None => Partition {
                misses: files.clone(),
                ..Partition::default()
            },
        };

        let report = if part.misses.is_empty() {
            DriverReport::default()
        } else {
            dispatch::run_batch(
                analyzer,
                &ctx.project_root,
                &part.misses,
                &ctx.config,
                ctx.cancel.clone(),
            )
            .await
        };
        drop(permit);

        record_batch(&ctx, &files, part, report).await;
    }
}

/// Fold one finished batch into the job: one unit per file, issues in
/// batch order, fresh results stored back to the cache.
async fn record_batch(
    ctx: &LaneContext,
    files: &[Utf8PathBuf],
    part: Partition,
    report: DriverReport,
) {
    // Group fresh issues by file. Tools occasionally echo a path the
    // batch never asked about; those ride along with the last file so
    // nothing is dropped.
    let mut fresh: HashMap<Utf8PathBuf, Vec<Issue>> = HashMap::new();
    let mut stray: Vec<Issue> = Vec::new();
    for issue in report.issues {
        if files.contains(&issue.file) {
            fresh.entry(issue.file.clone()).or_default().push(issue);
        } else {
            stray.push(issue);
        }
    }

    if let Some(cache) = &ctx.cache {
        for (file, hash) in &part.hashes {
            let issues = fresh.get(file).cloned().unwrap_or_default();
            cache.insert(ctx.lane.analyzer, hash, issues).await;
        }
    }

    let mut hits: HashMap<Utf8PathBuf, Vec<Issue>> = part.hits.into_iter().collect();

    let mut job = ctx.job.lock().await;
    if job.state.is_terminal() {
        // Cancelled while this batch was in flight; its results are
        // dropped, everything recorded earlier stays.
        return;
    }
    job.warnings.extend(report.warnings);
    for (idx, file) in files.iter().enumerate() {
        let mut unit_issues = hits
            .remove(file)
            .or_else(|| fresh.remove(file))
            .unwrap_or_default();
        if idx + 1 == files.len() {
            unit_issues.append(&mut stray);
        }
        unit_issues.retain(|issue| ctx.categories.contains(&issue.category));
        job.record_unit_finish(unit_issues);
    }
}
