//! Slicing pipeline and batch dispatch.
//!
//! # Components
//!
//! - [`SliceWorker`]: slices one image (open, decode, plan, encode tiles, write manifest)
//! - [`Dispatcher`]: runs one worker per input file and collects their reports
//! - [`SliceOutcome`] / [`SliceReport`]: the single message each worker sends back
//! - [`JobReport`] / [`Progress`]: batch totals owned by the dispatcher

mod dispatcher;
mod report;
mod worker;

pub use dispatcher::Dispatcher;
pub use report::{JobReport, Progress, SliceOutcome, SliceReport, SliceSummary};
pub use worker::{image_name, SliceJob, SliceOptions, SliceWorker, WorkerState};
