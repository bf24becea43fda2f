//! Output directory setup.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::BatchError;

/// Make sure `dir` exists, creating it and any parents if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<(), BatchError> {
    fs::create_dir_all(dir).map_err(|e| BatchError::OutputSetup {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })
}

/// Create `dir` if needed, then delete every file beneath it.
///
/// Subdirectories are kept (emptied of files, not removed). Returns the number
/// of files removed.
pub fn clear_output_dir(dir: &Path) -> Result<usize, BatchError> {
    ensure_output_dir(dir)?;

    let setup_error = |message: String| BatchError::OutputSetup {
        path: dir.to_path_buf(),
        message,
    };

    let mut removed = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| setup_error(e.to_string()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        fs::remove_file(entry.path()).map_err(|e| {
            setup_error(format!("failed to remove {}: {}", entry.path().display(), e))
        })?;
        debug!(path = %entry.path().display(), "removed");
        removed += 1;
    }

    Ok(removed)
}
