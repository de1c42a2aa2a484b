//! Critic - local code review engine.

use camino::Utf8PathBuf;
use clap::Parser;
use critic_cli::Args;
use critic_core::{AnalyzerKind, Category};
use critic_engine::{EngineConfig, ReviewRegistry};
use critic_state::{JobState, ReviewInput, StatusSnapshot};
use miette::{miette, IntoDiagnostic, Result};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let root = std::fs::canonicalize(args.dir.as_std_path())
        .map_err(|e| miette!("project root {}: {e}", args.dir))?;
    let root = Utf8PathBuf::from_path_buf(root)
        .map_err(|p| miette!("project root {} is not valid UTF-8", p.display()))?;

    let files = collect_files(&args)?;
    if files.is_empty() {
        return Err(miette!("no files to review; pass them as arguments or via --list"));
    }

    let analyzers = parse_names(&args.analyzers, AnalyzerKind::from_name, "analyzer")?;
    let categories = parse_names(&args.categories, Category::from_name, "category")?;

    let mut config = EngineConfig::default();
    config.max_concurrent_batches = args.jobs.max(1);
    config.eslint.deadline = Duration::from_secs(args.timeout);
    config.bandit.deadline = Duration::from_secs(args.timeout);
    if let Some(bin) = args.eslint_bin {
        config.eslint.binary = bin;
    }
    if let Some(bin) = args.bandit_bin {
        config.bandit.binary = bin;
    }
    if args.cache {
        config.cache_dir = Some(root.join(".critic"));
    }

    let registry = ReviewRegistry::new(config);
    let job_id = registry
        .create(ReviewInput {
            project_root: root,
            files,
            analyzers,
            categories,
        })
        .await
        .into_diagnostic()?;

    let snapshot = watch_until_done(&registry, &job_id, args.quiet).await?;
    let result = registry
        .result(&job_id)
        .await
        .into_diagnostic()?
        .ok_or_else(|| miette!("job {job_id} vanished before producing a result"))?;

    if !args.quiet {
        let summary = &result.summary;
        eprintln!(
            "{} issue(s) in {} file(s): {} critical, {} high, {} medium, {} low ({:.1}s)",
            summary.total,
            summary.affected_files,
            summary.critical,
            summary.high,
            summary.medium,
            summary.low,
            result.elapsed_seconds,
        );
        for warning in &result.warnings {
            eprintln!("warning [{}/{}]: {}", warning.analyzer, warning.kind.as_str(), warning.message);
        }
    }

    let json = serde_json::to_string_pretty(&result).into_diagnostic()?;
    match &args.output {
        Some(path) => std::fs::write(path.as_std_path(), json)
            .map_err(|e| miette!("writing {path}: {e}"))?,
        None => println!("{json}"),
    }

    match snapshot.state {
        JobState::Failed => Err(miette!(
            "review failed: {}",
            result.error.unwrap_or_else(|| "unknown error".to_string())
        )),
        JobState::Cancelled => {
            eprintln!("review cancelled; partial results exported");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Positional files plus the optional `--list` file.
fn collect_files(args: &Args) -> Result<Vec<Utf8PathBuf>> {
    let mut files = args.files.clone();
    if let Some(list) = &args.list {
        let content = std::fs::read_to_string(list.as_std_path())
            .map_err(|e| miette!("reading file list {list}: {e}"))?;
        files.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(Utf8PathBuf::from),
        );
    }
    Ok(files)
}

fn parse_names<T>(names: &[String], parse: fn(&str) -> Option<T>, what: &str) -> Result<Vec<T>> {
    names
        .iter()
        .map(|name| parse(name).ok_or_else(|| miette!("unknown {what}: {name}")))
        .collect()
}

/// Poll the job and paint progress to stderr until it is terminal.
async fn watch_until_done(
    registry: &ReviewRegistry,
    job_id: &str,
    quiet: bool,
) -> Result<StatusSnapshot> {
    loop {
        let snapshot = registry.status(job_id).await.into_diagnostic()?;
        if !quiet {
            let progress = &snapshot.progress;
            eprint!(
                "\r{} {}/{} unit(s){}{}   ",
                snapshot.state,
                progress.completed_units,
                progress.total_units,
                progress
                    .current_file
                    .as_deref()
                    .map(|f| format!(" - {f}"))
                    .unwrap_or_default(),
                progress
                    .eta_seconds
                    .map(|eta| format!(" (~{})", format_eta(eta)))
                    .unwrap_or_default(),
            );
        }
        if snapshot.state.is_terminal() {
            if !quiet {
                eprintln!();
            }
            return Ok(snapshot);
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

fn format_eta(seconds: f64) -> String {
    let secs = seconds.round() as u64;
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}
