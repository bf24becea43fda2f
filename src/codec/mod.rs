//! Codec layer.
//!
//! This module turns source files into rasters and grid regions back into
//! encoded tiles.
//!
//! # Components
//!
//! - [`TileFormat`] / [`DeclaredFormat`]: format detection from the file extension
//! - [`TileCodec`]: decode, region extraction, and format-mirroring encode
//! - [`SourceImage`]: a decoded raster owned by one worker
//! - [`RasterView`]: a borrowed rectangle of a [`SourceImage`]

mod encoder;
mod format;

pub use encoder::{
    clamp_quality, is_valid_quality, RasterView, SourceImage, TileCodec, DEFAULT_JPEG_QUALITY,
    MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use format::{DeclaredFormat, TileFormat};
