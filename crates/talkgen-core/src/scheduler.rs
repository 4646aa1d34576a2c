//! Batch scheduling: discover talk directories and fan them out across a
//! bounded worker pool.
//!
//! Keeps up to `workers` talks in flight at once; when one finishes, the
//! next queued talk is started until the queue is empty. Workers report
//! through an outcome channel to a single aggregating task, so no shared
//! collection needs a lock.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::convert::SlideRenderer;
use crate::process::{self, TalkOutcome, TalkRecord};

/// Accumulated results of one batch run. Filled by the aggregator task and
/// read only after every worker has joined.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Talks freshly converted this run.
    pub processed: Vec<TalkRecord>,
    /// Talks whose output already existed.
    pub skipped: Vec<TalkRecord>,
    pub errors: Vec<String>,
}

impl BatchReport {
    fn record(&mut self, outcome: TalkOutcome) {
        match outcome {
            TalkOutcome::Processed(record) => self.processed.push(record),
            TalkOutcome::Skipped(record) => self.skipped.push(record),
            TalkOutcome::Failed(msg) => {
                tracing::warn!("{msg}");
                self.errors.push(msg);
            }
        }
    }

    /// All talks that belong on the landing page, processed and skipped alike.
    pub fn listable(&self) -> Vec<TalkRecord> {
        self.processed
            .iter()
            .chain(self.skipped.iter())
            .cloned()
            .collect()
    }

    pub fn has_listable(&self) -> bool {
        !self.processed.is_empty() || !self.skipped.is_empty()
    }
}

/// Immediate subdirectories of `talks_dir`, hidden names excluded, sorted
/// so dispatch order is deterministic.
pub fn discover_talk_dirs(talks_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let entries = std::fs::read_dir(talks_dir)
        .with_context(|| format!("read talks dir: {}", talks_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Processes every talk under `talks_dir` with up to `workers` in flight.
///
/// One talk's failure (including a panicking worker) is recorded and never
/// aborts the batch. Returns only after every dispatched talk has reported
/// and the aggregator has drained the channel.
pub async fn run_batch(
    talks_dir: &Path,
    output_root: &Path,
    renderer: Arc<dyn SlideRenderer>,
    force: bool,
    workers: usize,
) -> Result<BatchReport> {
    let workers = workers.max(1);
    std::fs::create_dir_all(output_root)
        .with_context(|| format!("create output dir: {}", output_root.display()))?;
    let talk_dirs = discover_talk_dirs(talks_dir)?;
    tracing::info!("found {} talk dir(s) in {}", talk_dirs.len(), talks_dir.display());

    let (tx, mut rx) = tokio::sync::mpsc::channel::<TalkOutcome>(16);
    let aggregator = tokio::spawn(async move {
        let mut report = BatchReport::default();
        while let Some(outcome) = rx.recv().await {
            report.record(outcome);
        }
        report
    });

    let mut queue = talk_dirs.into_iter();
    let mut join_set = tokio::task::JoinSet::new();
    loop {
        while join_set.len() < workers {
            let Some(talk_dir) = queue.next() else {
                break;
            };
            let tx = tx.clone();
            let renderer = Arc::clone(&renderer);
            let output_root = output_root.to_path_buf();
            join_set.spawn(async move {
                let outcome =
                    process::process_talk(&talk_dir, &output_root, renderer.as_ref(), force).await;
                let _ = tx.send(outcome).await;
            });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        if let Err(e) = res {
            let _ = tx
                .send(TalkOutcome::Failed(format!("talk worker crashed: {e}")))
                .await;
        }
    }

    drop(tx);
    aggregator.await.context("outcome aggregator join")
}
