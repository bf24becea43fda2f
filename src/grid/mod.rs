//! Grid planning and tile naming.
//!
//! - [`plan`] / [`plan_with`]: compute the row-major sequence of tile rectangles
//! - [`GridSpec`]: validated row/column counts
//! - [`TileNaming`]: output file name scheme for each tile

mod naming;
mod planner;

pub use naming::TileNaming;
pub use planner::{plan, plan_with, GridSpec, PlannedTile, RemainderMode, TileOrigin, TileRect};
