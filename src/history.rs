use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::process::{ProcessConfig, spawn_and_stream};
use crate::record::{FailureRecord, HistoryStatus};

/// Fixed flag set for the version-control log command.
const LOG_ARGS: &[&str] = &["log", "-q"];

/// Marker prefix of a revision line in the log output, e.g. `r140220 | ...`.
const REVISION_MARKER: char = 'r';

/// Settings for the revision-history stage.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub command: String,
    /// Working directory for the log command: the content-test tree root.
    pub working_dir: PathBuf,
    pub workers: usize,
    pub max_attempts: u32,
    pub backoff: Duration,
    pub timeout: Option<Duration>,
}

impl HistoryConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            command: config.history_command.clone(),
            working_dir: config.layout_tests_dir.clone(),
            workers: config.workers,
            max_attempts: config.history_retries,
            backoff: Duration::from_millis(config.history_backoff_ms),
            timeout: config.history_timeout.map(Duration::from_secs),
        }
    }
}

/// Fetch revision history for every located record across a bounded worker
/// pool.
///
/// Fan-out is keyed by record index, so completion order cannot associate a
/// result with the wrong record; each task owns exactly one record's outcome.
/// Records without a `local_path` are never queried. A query that exhausts
/// its retry budget marks that record `HistoryStatus::Failed` and the run
/// continues.
pub async fn fetch_all(records: &mut [FailureRecord], config: &HistoryConfig) -> Result<()> {
    let work: Vec<(usize, PathBuf)> = records
        .iter()
        .enumerate()
        .filter_map(|(idx, r)| r.local_path.clone().map(|p| (idx, p)))
        .collect();
    if work.is_empty() {
        info!("no located records, skipping history fetch");
        return Ok(());
    }
    info!(count = work.len(), workers = config.workers, "fetching revision history");

    let semaphore = Arc::new(Semaphore::new(config.workers));
    let mut join_set = JoinSet::new();
    for (idx, path) in work {
        let config = config.clone();
        let semaphore = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore open");
            let outcome = fetch_one(&config, &path).await;
            (idx, outcome)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        let (idx, outcome) =
            joined.map_err(|e| Error::Process(format!("history worker panicked: {e}")))?;
        let record = &mut records[idx];
        match outcome {
            Ok(revisions) => {
                debug!(
                    name = record.generated_name,
                    count = revisions.len(),
                    "history fetched"
                );
                record.revisions = revisions;
                record.history = HistoryStatus::Fetched;
            }
            Err(e) => {
                warn!(name = record.generated_name, error = %e, "history fetch failed");
                record.history = HistoryStatus::Failed;
            }
        }
    }

    Ok(())
}

/// Run the log command for a single file with bounded retries and
/// exponential backoff.
async fn fetch_one(config: &HistoryConfig, path: &Path) -> Result<Vec<String>> {
    let mut backoff = config.backoff;
    let mut last_reason = String::new();

    for attempt in 1..=config.max_attempts {
        if attempt > 1 {
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }

        let mut args: Vec<String> = LOG_ARGS.iter().map(|s| s.to_string()).collect();
        args.push(path.display().to_string());
        let process = ProcessConfig {
            command: config.command.clone(),
            args,
            working_dir: config.working_dir.clone(),
            timeout: config.timeout,
            log_prefix: format!("history:{}", path.display()),
        };

        match spawn_and_stream(process).await {
            Ok(output) if output.success() => {
                return Ok(parse_revisions(&output.stdout_lines));
            }
            Ok(output) => {
                last_reason = format!("exit code {}", output.exit_code);
            }
            Err(e) => {
                last_reason = e.to_string();
            }
        }
        warn!(
            path = %path.display(),
            attempt,
            max_attempts = config.max_attempts,
            reason = last_reason,
            "history query failed"
        );
    }

    Err(Error::HistoryFetchFailed {
        path: path.to_path_buf(),
        reason: last_reason,
    })
}

/// Keep revision ids from log output, in emission order (newest first).
fn parse_revisions(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.starts_with(REVISION_MARKER))
        .filter_map(|line| line.split_whitespace().next())
        .map(|id| id.to_string())
        .collect()
}
