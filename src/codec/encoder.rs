//! Tile codec.
//!
//! This module decodes a whole source image into memory, hands out read-only
//! views of grid regions, and encodes each region back into the source's
//! format family.
//!
//! # Design Decisions
//!
//! - **Format mirrors input**: PNG sources produce PNG tiles, JPEG sources
//!   produce JPEG tiles. There is no cross-format conversion.
//!
//! - **No resizing**: Tiles keep the pixel size of their grid cell.
//!
//! - **Quality control**: JPEG tiles default to quality 100. PNG output is
//!   lossless and keeps the source colour type.
//!
//! - **No decode cap**: the whole source is held in memory, so decoding runs
//!   without `image`'s default 512 MiB allocation limit. A cap can be set with
//!   [`TileCodec::with_max_decode_alloc`].

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageReader, Limits};
use std::io::Cursor;

use crate::error::CodecError;
use crate::grid::TileRect;

use super::format::TileFormat;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// Source image and views
// =============================================================================

/// A fully decoded source raster.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    format: TileFormat,
}

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub const fn format(&self) -> TileFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Borrowed, read-only view of one rectangle of a [`SourceImage`].
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    source: &'a SourceImage,
    rect: TileRect,
}

impl RasterView<'_> {
    pub const fn rect(&self) -> TileRect {
        self.rect
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.rect.width(), self.rect.height())
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Decoder/encoder for source images and their tiles.
///
/// # Example
///
/// ```ignore
/// use image_slicer::codec::{TileCodec, TileFormat};
/// use image_slicer::grid::TileRect;
///
/// let codec = TileCodec::new();
/// let source = codec.decode(&png_bytes, TileFormat::Png)?;
///
/// let view = codec.extract_region(&source, TileRect { x0: 0, y0: 0, x1: 50, y1: 50 })?;
/// let tile = codec.encode(&view, source.format())?;
/// ```
#[derive(Debug, Clone)]
pub struct TileCodec {
    jpeg_quality: u8,
    limits: Limits,
}

impl Default for TileCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TileCodec {
    /// Create a codec that writes JPEG tiles at maximum quality.
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            limits: Limits::no_limits(),
        }
    }

    /// Create a codec with a specific JPEG quality, clamped to 1-100.
    pub fn with_jpeg_quality(quality: u8) -> Self {
        Self {
            jpeg_quality: clamp_quality(quality),
            ..Self::new()
        }
    }

    /// Cap the memory a single decode may allocate. `None` removes the cap.
    pub fn with_max_decode_alloc(mut self, max_bytes: Option<u64>) -> Self {
        let mut limits = Limits::no_limits();
        limits.max_alloc = max_bytes;
        self.limits = limits;
        self
    }

    pub const fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Allocation cap applied while decoding, if any.
    pub fn max_decode_alloc(&self) -> Option<u64> {
        self.limits.max_alloc
    }

    /// Decode a complete source image in the declared format.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecodeError`] if the bytes are not a valid stream
    /// of `format`, or if decoding would exceed the configured allocation cap.
    pub fn decode(&self, bytes: &[u8], format: TileFormat) -> Result<SourceImage, CodecError> {
        let mut reader = ImageReader::with_format(Cursor::new(bytes), format.image_format());
        reader.limits(self.limits.clone());

        let image = reader.decode().map_err(|e| CodecError::DecodeError {
            message: e.to_string(),
        })?;

        Ok(SourceImage { image, format })
    }

    /// Borrow the region `rect` of `source`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::EmptyRegion`] if `rect` has no pixels
    /// - [`CodecError::OutOfBounds`] if `rect` extends past the image
    pub fn extract_region<'a>(
        &self,
        source: &'a SourceImage,
        rect: TileRect,
    ) -> Result<RasterView<'a>, CodecError> {
        let TileRect { x0, y0, x1, y1 } = rect;

        if rect.is_empty() {
            return Err(CodecError::EmptyRegion { x0, y0, x1, y1 });
        }

        let (width, height) = source.dimensions();
        if x1 > width || y1 > height {
            return Err(CodecError::OutOfBounds {
                x0,
                y0,
                x1,
                y1,
                width,
                height,
            });
        }

        Ok(RasterView { source, rect })
    }

    /// Encode a view as `format`.
    ///
    /// JPEG has no alpha channel and no 16-bit samples, so such views are
    /// flattened to 8-bit RGB (or 8-bit luma for grey sources) first.
    pub fn encode(&self, view: &RasterView<'_>, format: TileFormat) -> Result<Bytes, CodecError> {
        let rect = view.rect;
        let tile = view
            .source
            .image
            .crop_imm(rect.x0, rect.y0, rect.width(), rect.height());

        let mut output = Vec::new();

        let result = match format {
            TileFormat::Png => tile.write_with_encoder(PngEncoder::new(&mut output)),
            TileFormat::Jpeg => {
                let tile = jpeg_compatible(tile);
                let encoder = JpegEncoder::new_with_quality(&mut output, self.jpeg_quality);
                tile.write_with_encoder(encoder)
            }
        };

        result.map_err(|e| CodecError::EncodeError {
            message: e.to_string(),
        })?;

        Ok(Bytes::from(output))
    }
}

fn jpeg_compatible(tile: DynamicImage) -> DynamicImage {
    match tile.color() {
        ColorType::L8 | ColorType::Rgb8 => tile,
        ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            DynamicImage::ImageLuma8(tile.to_luma8())
        }
        _ => DynamicImage::ImageRgb8(tile.to_rgb8()),
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Validate JPEG quality parameter.
///
/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
