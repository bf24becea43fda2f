//! Filesystem and console I/O around the slicing pipeline.

mod input;
mod output;
mod prompt;

pub use input::list_inputs;
pub use output::{clear_output_dir, ensure_output_dir};
pub use prompt::prompt_count;
