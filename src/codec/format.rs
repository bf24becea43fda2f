//! Format detection from file extensions.
//!
//! The format of a source image is taken from its extension only, matched
//! case-insensitively. Content is never sniffed: a PNG stream in a `.jpg` file
//! is decoded as JPEG and fails.

use std::path::Path;

use crate::error::FormatError;

/// Raster formats that can be sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileFormat {
    /// Lossless; tiles are written as PNG.
    Png,
    /// Lossy; tiles are written as JPEG at the configured quality.
    Jpeg,
}

impl TileFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            TileFormat::Png => "PNG",
            TileFormat::Jpeg => "JPEG",
        }
    }

    /// Map a lowercase extension (without the dot) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "png" => Some(TileFormat::Png),
            "jpg" | "jpeg" => Some(TileFormat::Jpeg),
            _ => None,
        }
    }

    /// Detect the format of `path` from its extension.
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        DeclaredFormat::from_path(path).map(|declared| declared.format)
    }

    pub(crate) const fn image_format(&self) -> image::ImageFormat {
        match self {
            TileFormat::Png => image::ImageFormat::Png,
            TileFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// A detected format together with the source's lowercased extension.
///
/// Tiles reuse the extension so that `photo.JPEG` produces `photo-11.jpeg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredFormat {
    pub format: TileFormat,
    pub extension: String,
}

impl DeclaredFormat {
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .ok_or(FormatError::MissingExtension)?;

        let format = TileFormat::from_extension(&extension).ok_or_else(|| {
            FormatError::Unsupported {
                extension: extension.clone(),
            }
        })?;

        Ok(Self { format, extension })
    }
}
