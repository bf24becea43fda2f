//! Outcomes of slicing jobs and their aggregation.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SliceError;
use crate::grid::TileOrigin;

// =============================================================================
// Per-image outcome
// =============================================================================

/// What a successful worker produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSummary {
    /// Source file name without its extension
    pub image_name: String,

    /// Tile origins in row-major order, as written to the manifest
    pub origins: Vec<TileOrigin>,

    /// Written tile files in row-major order
    pub tile_paths: Vec<PathBuf>,

    /// Written manifest file
    pub manifest_path: PathBuf,
}

impl SliceSummary {
    pub fn tile_count(&self) -> usize {
        self.tile_paths.len()
    }
}

impl fmt::Display for SliceSummary {
    /// `photo: [{x: 0, y: 0}, {x: 50, y: 0}]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.image_name)?;
        for (i, origin) in self.origins.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{{x: {}, y: {}}}", origin.x, origin.y)?;
        }
        f.write_str("]")
    }
}

/// Final result of one worker. Exactly one is produced per input image.
#[derive(Debug)]
pub enum SliceOutcome {
    Success(SliceSummary),
    Failure(SliceError),
}

impl SliceOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, SliceOutcome::Success(_))
    }
}

impl From<Result<SliceSummary, SliceError>> for SliceOutcome {
    fn from(result: Result<SliceSummary, SliceError>) -> Self {
        match result {
            Ok(summary) => SliceOutcome::Success(summary),
            Err(err) => SliceOutcome::Failure(err),
        }
    }
}

/// Message sent from a worker to the dispatcher.
#[derive(Debug)]
pub struct SliceReport {
    /// Launch position of the worker within the batch
    pub index: usize,

    /// Source image path
    pub source: PathBuf,

    pub outcome: SliceOutcome,
}

impl SliceReport {
    /// File name of the source, for console output.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Running totals for a batch, updated once per collected report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl Progress {
    pub const fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, outcome: &SliceOutcome) {
        self.completed += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Completed share of the batch, 0-100. An empty batch is complete.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.completed * 100 / self.total
    }
}

/// Aggregate result of a whole batch.
#[derive(Debug, Default)]
pub struct JobReport {
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,

    /// Reports in the order they were collected
    pub reports: Vec<SliceReport>,
}

impl JobReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.succeeded as f64 * 100.0 / self.total() as f64
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Iterate over failed reports.
    pub fn failures(&self) -> impl Iterator<Item = &SliceReport> {
        self.reports.iter().filter(|r| !r.outcome.is_success())
    }
}
