//! Input directory listing.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BatchError;

/// List candidate images in `dir`, sorted by file name.
///
/// Every entry that is not a directory is a candidate; there is no filtering
/// by extension, so unsupported files surface later as per-image failures.
///
/// # Errors
///
/// - [`BatchError::InputUnreadable`] if the directory cannot be read
/// - [`BatchError::InputEmpty`] if it holds no files
pub fn list_inputs(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let unreadable = |source: std::io::Error| BatchError::InputUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if path.is_dir() {
            debug!(path = %path.display(), "skipping directory entry");
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(BatchError::InputEmpty {
            path: dir.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
