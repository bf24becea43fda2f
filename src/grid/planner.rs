//! Grid geometry for slicing an image into rows and columns.
//!
//! Slice sizes use truncating division: `slice_width = width / cols` and
//! `slice_height = height / rows`. With the default [`RemainderMode::Drop`],
//! pixels beyond `cols * slice_width` or `rows * slice_height` belong to no
//! tile. [`RemainderMode::Cover`] stretches the last column and row to the
//! image edge instead.
//!
//! Tiles are always produced in row-major order: all columns of row 0, then
//! all columns of row 1, and so on.

use serde::{Deserialize, Serialize};

// =============================================================================
// GridSpec
// =============================================================================

/// Requested number of rows and columns. Both are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    rows: u32,
    cols: u32,
}

impl GridSpec {
    /// Create a grid, rejecting zero rows or columns.
    pub fn new(rows: u32, cols: u32) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Self { rows, cols })
    }

    /// Create a grid, raising any count below 1 to 1.
    pub fn clamped(rows: i64, cols: i64) -> Self {
        let clamp = |v: i64| u32::try_from(v.max(1)).unwrap_or(u32::MAX);
        Self {
            rows: clamp(rows),
            cols: clamp(cols),
        }
    }

    pub const fn rows(&self) -> u32 {
        self.rows
    }

    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of tiles, `rows * cols`.
    pub const fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

/// What happens to pixels left over by truncating division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum RemainderMode {
    /// Remainder pixels are excluded from every tile.
    #[default]
    Drop,
    /// The last column and last row extend to the image edge.
    Cover,
}

// =============================================================================
// Tile geometry
// =============================================================================

/// Rectangle in source pixel coordinates, `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TileRect {
    pub const fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub const fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// True when the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Top-left corner.
    pub const fn origin(&self) -> TileOrigin {
        TileOrigin {
            x: self.x0,
            y: self.y0,
        }
    }
}

/// Top-left pixel of one tile, as recorded in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileOrigin {
    pub x: u32,
    pub y: u32,
}

/// One cell of the grid: its 0-based position and its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTile {
    pub row: u32,
    pub col: u32,
    pub rect: TileRect,
}

impl PlannedTile {
    pub const fn origin(&self) -> TileOrigin {
        self.rect.origin()
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Plan a grid with truncation-drop semantics.
pub fn plan(width: u32, height: u32, grid: GridSpec) -> impl Iterator<Item = PlannedTile> {
    plan_with(width, height, grid, RemainderMode::Drop)
}

/// Plan a grid of `grid.rows() * grid.cols()` tiles in row-major order.
///
/// Tiles are produced lazily, so a grid far larger than the image costs
/// nothing until it is walked.
///
/// When `cols > width` or `rows > height` the slice size is zero and the
/// resulting rectangles are empty. They are still yielded; rejecting them is
/// left to region extraction so the failure is reported rather than skipped.
pub fn plan_with(
    width: u32,
    height: u32,
    grid: GridSpec,
    remainder: RemainderMode,
) -> impl Iterator<Item = PlannedTile> {
    let GridSpec { rows, cols } = grid;
    let slice_width = width / cols;
    let slice_height = height / rows;

    (0..rows).flat_map(move |row| {
        (0..cols).map(move |col| {
            let x0 = col * slice_width;
            let y0 = row * slice_height;
            let mut x1 = (col + 1) * slice_width;
            let mut y1 = (row + 1) * slice_height;

            if remainder == RemainderMode::Cover {
                if col == cols - 1 {
                    x1 = width;
                }
                if row == rows - 1 {
                    y1 = height;
                }
            }

            PlannedTile {
                row,
                col,
                rect: TileRect { x0, y0, x1, y1 },
            }
        })
    })
}

// =============================================================================
// Tests
// =============================================================================
