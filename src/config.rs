//! Configuration management for the image slicer.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `SLICER_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use image_slicer::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Slicing {} into {}", config.input.display(), config.output.display());
//! ```
//!
//! # Environment Variables
//!
//! - `SLICER_INPUT` - Directory of source images (default: ./src)
//! - `SLICER_OUTPUT` - Directory for tiles and manifests (default: ./dist)
//! - `SLICER_ROWS` - Number of rows (prompted for when unset)
//! - `SLICER_COLS` - Number of columns (prompted for when unset)
//! - `SLICER_WORKERS` - Max concurrent workers, 0 for one per image (default: 0)
//! - `SLICER_JPEG_QUALITY` - JPEG tile quality (default: 100)
//! - `SLICER_NAMING` - Tile file naming: concatenated or padded (default: concatenated)
//! - `SLICER_REMAINDER` - Remainder pixels: drop or cover (default: drop)

use std::path::{Component, Path, PathBuf};

use clap::Parser;

use crate::codec::{is_valid_quality, TileCodec, DEFAULT_JPEG_QUALITY};
use crate::grid::{RemainderMode, TileNaming};
use crate::slice::SliceOptions;

// =============================================================================
// Default Values
// =============================================================================

/// Default directory of source images.
pub const DEFAULT_INPUT_DIR: &str = "./src";

/// Default directory for tiles and manifests.
pub const DEFAULT_OUTPUT_DIR: &str = "./dist";

/// Default worker limit; 0 launches one worker per image.
pub const DEFAULT_MAX_WORKERS: usize = 0;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Slicer - cut images into a grid of tiles.
///
/// Every PNG or JPEG in the input directory is split into rows x columns tiles.
/// Each tile is written to the output directory along with a JSON manifest of
/// tile origins.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-slicer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Directories
    // =========================================================================
    /// Directory containing the images to slice.
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR, env = "SLICER_INPUT")]
    pub input: PathBuf,

    /// Directory receiving tiles and manifests.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, env = "SLICER_OUTPUT")]
    pub output: PathBuf,

    /// Do not delete existing files in the output directory before slicing.
    #[arg(long, default_value_t = false)]
    pub keep_output: bool,

    // =========================================================================
    // Grid
    // =========================================================================
    /// Number of horizontal rows. Prompted for when omitted.
    #[arg(short, long, env = "SLICER_ROWS", allow_negative_numbers = true)]
    pub rows: Option<i64>,

    /// Number of vertical columns. Prompted for when omitted.
    #[arg(short, long, env = "SLICER_COLS", allow_negative_numbers = true)]
    pub cols: Option<i64>,

    /// How tile files are named.
    ///
    /// `concatenated` writes `name-<row><col>.ext` and is ambiguous once rows
    /// or columns pass 10; `padded` writes `name-<row>-<col>.ext`.
    #[arg(long, value_enum, default_value_t = TileNaming::Concatenated, env = "SLICER_NAMING")]
    pub naming: TileNaming,

    /// What to do with pixels left over when the size is not divisible.
    ///
    /// `drop` leaves them out of every tile; `cover` stretches the last row
    /// and column to the image edge.
    #[arg(long, value_enum, default_value_t = RemainderMode::Drop, env = "SLICER_REMAINDER")]
    pub remainder: RemainderMode,

    // =========================================================================
    // Encoding & Concurrency
    // =========================================================================
    /// JPEG quality for tiles cut from JPEG sources (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "SLICER_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Maximum number of images processed at once (0 = one worker per image).
    #[arg(short, long, default_value_t = DEFAULT_MAX_WORKERS, env = "SLICER_WORKERS")]
    pub workers: usize,

    // =========================================================================
    // Reporting
    // =========================================================================
    /// Exit with a failure status if any image fails.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_quality(self.jpeg_quality) {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if self.input.as_os_str().is_empty() {
            return Err("Input directory is required. Set --input or SLICER_INPUT".to_string());
        }

        if self.output.as_os_str().is_empty() {
            return Err("Output directory is required. Set --output or SLICER_OUTPUT".to_string());
        }

        // Clearing the output would delete the sources
        let input = resolve_dir(&self.input)?;
        let output = resolve_dir(&self.output)?;
        if input.starts_with(&output) {
            return Err(format!(
                "Input directory {} must differ from the output directory {} and not lie inside it",
                self.input.display(),
                self.output.display()
            ));
        }

        Ok(())
    }

    /// Worker limit for the dispatcher; `None` means unbounded.
    pub fn max_workers(&self) -> Option<usize> {
        (self.workers > 0).then_some(self.workers)
    }

    /// Per-image options derived from this configuration.
    pub fn slice_options(&self) -> SliceOptions {
        SliceOptions {
            codec: TileCodec::with_jpeg_quality(self.jpeg_quality),
            naming: self.naming,
            remainder: self.remainder,
        }
    }
}

/// Absolute form of `path` with `.` and `..` removed and symlinks resolved
/// for every prefix that exists on disk.
fn resolve_dir(path: &Path) -> Result<PathBuf, String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| format!("Cannot resolve {}: {}", path.display(), e))?
            .join(path)
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
        if let Ok(canonical) = resolved.canonicalize() {
            resolved = canonical;
        }
    }

    Ok(resolved)
}

// =============================================================================
// Tests
// =============================================================================
