//! Single-image slicing pipeline.
//!
//! A [`SliceWorker`] takes one source file through
//! `Opening → Decoding → Planning → Encoding → WritingManifest → Done`.
//! The first failure stops the pipeline and moves the worker to `Failed`.
//! Tiles already on disk at that point are left in place.
//!
//! The worker is synchronous. The dispatcher runs it on Tokio's blocking pool,
//! because decoding and encoding are CPU-bound and all file access is blocking.

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, info_span};

use crate::codec::{DeclaredFormat, SourceImage, TileCodec};
use crate::error::{SliceError, TileWriteError};
use crate::grid::{plan_with, GridSpec, PlannedTile, RemainderMode, TileNaming};
use crate::manifest::{manifest_path, write_manifest};

use super::report::SliceSummary;

// =============================================================================
// Job description
// =============================================================================

/// Settings shared by every worker in a batch.
#[derive(Debug, Clone, Default)]
pub struct SliceOptions {
    pub codec: TileCodec,
    pub naming: TileNaming,
    pub remainder: RemainderMode,
}

/// One source image to slice.
#[derive(Debug, Clone)]
pub struct SliceJob {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub grid: GridSpec,
}

impl SliceJob {
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, grid: GridSpec) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            grid,
        }
    }
}

/// Pipeline stage of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Opening,
    Decoding,
    Planning,
    Encoding { tile: usize, total: usize },
    WritingManifest,
    Done,
    Failed,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Opening => f.write_str("opening"),
            WorkerState::Decoding => f.write_str("decoding"),
            WorkerState::Planning => f.write_str("planning"),
            WorkerState::Encoding { tile, total } => write!(f, "encoding tile {}/{}", tile + 1, total),
            WorkerState::WritingManifest => f.write_str("writing manifest"),
            WorkerState::Done => f.write_str("done"),
            WorkerState::Failed => f.write_str("failed"),
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

/// Slices one image end to end.
///
/// # Example
///
/// ```ignore
/// use image_slicer::grid::GridSpec;
/// use image_slicer::slice::{SliceJob, SliceOptions, SliceWorker};
///
/// let job = SliceJob::new("src/photo.png", "dist", GridSpec::new(2, 2).unwrap());
/// let summary = SliceWorker::new(job, SliceOptions::default()).run()?;
///
/// println!("{}", summary); // photo: [{x: 0, y: 0}, ...]
/// ```
pub struct SliceWorker {
    job: SliceJob,
    options: SliceOptions,
    state: WorkerState,
}

impl SliceWorker {
    pub fn new(job: SliceJob, options: SliceOptions) -> Self {
        Self {
            job,
            options,
            state: WorkerState::Opening,
        }
    }

    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// Run the pipeline to completion.
    ///
    /// Failures are logged with the stage they occurred in before being
    /// returned.
    pub fn run(mut self) -> Result<SliceSummary, SliceError> {
        let span = info_span!("slice", image = %self.job.source.display());
        let _enter = span.enter();

        let result = self.execute();

        match &result {
            Ok(summary) => info!(tiles = summary.tile_count(), "image sliced"),
            Err(err) => {
                error!(state = %self.state, kind = err.kind(), "{}", err);
                self.transition(WorkerState::Failed);
            }
        }

        result
    }

    fn transition(&mut self, next: WorkerState) {
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }

    fn execute(&mut self) -> Result<SliceSummary, SliceError> {
        let path = self.job.source.clone();

        self.state = WorkerState::Opening;
        let mut file = File::open(&path).map_err(|source| SliceError::FileOpen {
            path: path.clone(),
            source,
        })?;

        let declared = DeclaredFormat::from_path(&path).map_err(|source| SliceError::Format {
            path: path.clone(),
            source,
        })?;

        self.transition(WorkerState::Decoding);
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| SliceError::FileOpen {
                path: path.clone(),
                source,
            })?;
        drop(file);

        let image = self
            .options
            .codec
            .decode(&bytes, declared.format)
            .map_err(|source| SliceError::Decode {
                path: path.clone(),
                source,
            })?;
        drop(bytes);

        self.transition(WorkerState::Planning);
        let grid = self.job.grid;
        let tiles = plan_with(image.width(), image.height(), grid, self.options.remainder);
        debug!(
            width = image.width(),
            height = image.height(),
            rows = grid.rows(),
            cols = grid.cols(),
            "planned grid"
        );

        let name = image_name(&path);
        let total = grid.tile_count();
        let mut origins = Vec::new();
        let mut tile_paths = Vec::new();

        for (index, tile) in tiles.enumerate() {
            self.transition(WorkerState::Encoding { tile: index, total });

            let file_name =
                self.options
                    .naming
                    .file_name(&name, tile.row, tile.col, grid, &declared.extension);
            let tile_path = self.job.output_dir.join(file_name);

            self.write_tile(&image, &tile, &tile_path)
                .map_err(|source| SliceError::TileWrite {
                    path: tile_path.clone(),
                    source,
                })?;

            origins.push(tile.origin());
            tile_paths.push(tile_path);
        }

        self.transition(WorkerState::WritingManifest);
        let manifest = manifest_path(&self.job.output_dir, &name);
        write_manifest(&origins, &manifest).map_err(|source| SliceError::ManifestWrite {
            path: manifest.clone(),
            source,
        })?;

        self.transition(WorkerState::Done);

        Ok(SliceSummary {
            image_name: name,
            origins,
            tile_paths,
            manifest_path: manifest,
        })
    }

    fn write_tile(
        &self,
        image: &SourceImage,
        tile: &PlannedTile,
        path: &Path,
    ) -> Result<(), TileWriteError> {
        let codec = &self.options.codec;
        let view = codec.extract_region(image, tile.rect)?;
        let encoded = codec.encode(&view, image.format())?;
        fs::write(path, &encoded)?;
        Ok(())
    }
}

/// File name of `path` without its extension.
pub fn image_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// =============================================================================
// Tests
// =============================================================================
