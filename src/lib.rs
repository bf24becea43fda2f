//! # Image Slicer
//!
//! Cuts PNG and JPEG images on a rows x columns grid into tiles. It writes
//! each tile to disk next to a JSON manifest of tile origins.
//!
//! A directory of images is processed concurrently with one worker per
//! image. Each worker reports exactly one outcome back to the dispatcher.
//!
//! ## Features
//!
//! - **Truncating grid**: slice sizes are `width / cols` and `height / rows`;
//!   leftover pixels are dropped unless `RemainderMode::Cover` is requested
//! - **Format mirroring**: PNG tiles from PNG sources, max-quality JPEG tiles from JPEG sources
//! - **Manifests**: `<name>.json` lists tile origins in row-major order
//! - **Isolated workers**: a failing image never stops the rest of the batch
//!
//! ## Architecture
//!
//! - [`grid`] - Grid planning and tile file naming
//! - [`codec`] - Format detection, decoding, region extraction, encoding
//! - [`manifest`] - JSON manifest of tile origins
//! - [`slice`] - Per-image worker and batch dispatcher
//! - [`io`] - Input listing, output directory setup, interactive prompt
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use image_slicer::{list_inputs, Dispatcher, GridSpec, SliceOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let inputs = list_inputs(Path::new("./src")).expect("readable input directory");
//!     let grid = GridSpec::new(2, 2).expect("non-zero grid");
//!
//!     let report = Dispatcher::new(SliceOptions::default())
//!         .run(inputs, Path::new("./dist"), grid)
//!         .await;
//!
//!     println!("{} succeeded, {} failed", report.succeeded, report.failed);
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod manifest;
pub mod slice;

// Re-export commonly used types
pub use codec::{DeclaredFormat, RasterView, SourceImage, TileCodec, TileFormat};
pub use config::Config;
pub use error::{BatchError, CodecError, FormatError, ManifestError, SliceError, TileWriteError};
pub use grid::{plan, plan_with, GridSpec, PlannedTile, RemainderMode, TileNaming, TileOrigin, TileRect};
pub use io::{clear_output_dir, ensure_output_dir, list_inputs, prompt_count};
pub use manifest::{manifest_path, read_manifest, write_manifest};
pub use slice::{
    Dispatcher, JobReport, Progress, SliceJob, SliceOptions, SliceOutcome, SliceReport,
    SliceSummary, SliceWorker,
};
