//! JSON manifest of tile origins.
//!
//! Each sliced image gets a sidecar `<name>.json` next to its tiles holding
//! the top-left corner of every tile in row-major order:
//!
//! ```text
//! [{"x":0,"y":0},{"x":50,"y":0},{"x":0,"y":50},{"x":50,"y":50}]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ManifestError;
use crate::grid::TileOrigin;

/// Path of the manifest for the image named `image_name`.
pub fn manifest_path(output_dir: &Path, image_name: &str) -> PathBuf {
    output_dir.join(format!("{image_name}.json"))
}

/// Serialize origins to compact JSON.
pub fn to_json(origins: &[TileOrigin]) -> Result<Vec<u8>, ManifestError> {
    Ok(serde_json::to_vec(origins)?)
}

/// Write the manifest to `path`, replacing any existing file.
pub fn write_manifest(origins: &[TileOrigin], path: &Path) -> Result<(), ManifestError> {
    let json = to_json(origins)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a manifest back.
pub fn read_manifest(path: &Path) -> Result<Vec<TileOrigin>, ManifestError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
