//! Batch dispatcher for slicing many images concurrently.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   spawn (optionally gated by Semaphore)
//! │   launcher    │──────────────┬──────────────┬──────────────┐
//! └───────────────┘              ▼              ▼              ▼
//!                         ┌────────────┐ ┌────────────┐ ┌────────────┐
//!                         │ SliceWorker│ │ SliceWorker│ │ SliceWorker│
//!                         │ (blocking) │ │ (blocking) │ │ (blocking) │
//!                         └─────┬──────┘ └─────┬──────┘ └─────┬──────┘
//!                               │ SliceReport  │              │
//!                               ▼              ▼              ▼
//!                         ┌─────────────────────────────────────────┐
//!                         │      mpsc completion channel            │
//!                         └────────────────────┬────────────────────┘
//!                                              ▼
//!                         ┌─────────────────────────────────────────┐
//!                         │ collection loop (owns Progress/JobReport)│
//!                         └─────────────────────────────────────────┘
//! ```
//!
//! Workers never share state. Each one sends exactly one [`SliceReport`]
//! and the collection loop is the only owner of the running totals. Reports
//! are consumed in completion order; `SliceReport::index` records the launch
//! slot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Semaphore};
use tokio::task;
use tracing::{debug, error, info, warn};

use crate::error::SliceError;
use crate::grid::GridSpec;

use super::report::{JobReport, Progress, SliceOutcome, SliceReport};
use super::worker::{SliceJob, SliceOptions, SliceWorker};

/// Launches one [`SliceWorker`] per input file and collects their outcomes.
///
/// # Example
///
/// ```ignore
/// use image_slicer::grid::GridSpec;
/// use image_slicer::slice::{Dispatcher, SliceOptions};
///
/// let dispatcher = Dispatcher::new(SliceOptions::default()).with_max_workers(Some(4));
/// let report = dispatcher
///     .run(inputs, Path::new("dist"), GridSpec::new(2, 3).unwrap())
///     .await;
///
/// println!("{} ok, {} failed in {:?}", report.succeeded, report.failed, report.elapsed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    options: SliceOptions,
    max_workers: Option<usize>,
}

impl Dispatcher {
    /// Create a dispatcher with unbounded fan-out (one task per file).
    pub fn new(options: SliceOptions) -> Self {
        Self {
            options,
            max_workers: None,
        }
    }

    /// Limit how many workers run at once. `None` or `Some(0)` means unbounded.
    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        self.max_workers = max_workers.filter(|&n| n > 0);
        self
    }

    pub fn max_workers(&self) -> Option<usize> {
        self.max_workers
    }

    pub fn options(&self) -> &SliceOptions {
        &self.options
    }

    /// Slice every file in `inputs` into `output_dir`.
    pub async fn run(&self, inputs: Vec<PathBuf>, output_dir: &Path, grid: GridSpec) -> JobReport {
        self.run_with(inputs, output_dir, grid, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_report` as each outcome arrives.
    ///
    /// Directory entries in `inputs` are skipped. Returns once exactly one
    /// report has been collected for every launched worker.
    pub async fn run_with<F>(
        &self,
        inputs: Vec<PathBuf>,
        output_dir: &Path,
        grid: GridSpec,
        mut on_report: F,
    ) -> JobReport
    where
        F: FnMut(&SliceReport, &Progress),
    {
        let start = Instant::now();

        let jobs: Vec<SliceJob> = inputs
            .into_iter()
            .filter(|path| {
                let is_dir = path.is_dir();
                if is_dir {
                    debug!(path = %path.display(), "skipping directory");
                }
                !is_dir
            })
            .map(|source| SliceJob::new(source, output_dir, grid))
            .collect();

        let total = jobs.len();
        info!(
            images = total,
            rows = grid.rows(),
            cols = grid.cols(),
            max_workers = ?self.max_workers,
            "dispatching slice workers"
        );

        let (tx, mut rx) = mpsc::unbounded_channel();
        let limiter = self.max_workers.map(|n| Arc::new(Semaphore::new(n)));
        let launcher = tokio::spawn(launch_workers(jobs, self.options.clone(), limiter, tx));

        let mut progress = Progress::new(total);
        let mut report = JobReport {
            reports: Vec::with_capacity(total),
            ..JobReport::default()
        };

        while progress.completed < total {
            let Some(slice_report) = rx.recv().await else {
                error!(
                    collected = progress.completed,
                    expected = total,
                    "result channel closed before every worker reported"
                );
                break;
            };

            progress.record(&slice_report.outcome);
            match &slice_report.outcome {
                SliceOutcome::Success(summary) => debug!(
                    index = slice_report.index,
                    image = %summary.image_name,
                    tiles = summary.tile_count(),
                    "collected success"
                ),
                SliceOutcome::Failure(err) => warn!(
                    index = slice_report.index,
                    file = %slice_report.file_name(),
                    kind = err.kind(),
                    "collected failure"
                ),
            }
            debug!(percent = progress.percent(), "overall progress");

            on_report(&slice_report, &progress);
            report.reports.push(slice_report);
        }

        if let Err(e) = launcher.await {
            error!("worker launcher failed: {}", e);
        }

        report.succeeded = progress.succeeded;
        report.failed = progress.failed;
        report.elapsed = start.elapsed();

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "batch finished"
        );

        report
    }
}

/// Spawn one task per job, waiting for a permit first when bounded.
async fn launch_workers(
    jobs: Vec<SliceJob>,
    options: SliceOptions,
    limiter: Option<Arc<Semaphore>>,
    tx: mpsc::UnboundedSender<SliceReport>,
) {
    for (index, job) in jobs.into_iter().enumerate() {
        let permit = match &limiter {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };

        let tx = tx.clone();
        let options = options.clone();

        tokio::spawn(async move {
            let source = job.source.clone();
            let result = task::spawn_blocking(move || SliceWorker::new(job, options).run()).await;
            drop(permit);

            let outcome = match result {
                Ok(result) => SliceOutcome::from(result),
                Err(e) => SliceOutcome::Failure(SliceError::Worker {
                    path: source.clone(),
                    message: e.to_string(),
                }),
            };

            // The receiver only goes away if the dispatcher itself was dropped
            let _ = tx.send(SliceReport {
                index,
                source,
                outcome,
            });
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
