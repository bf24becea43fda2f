use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when the image format cannot be derived from a file name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// File name has no extension at all
    #[error("missing file extension: format has to be png or jpg")]
    MissingExtension,

    /// Extension is present but names a format we do not slice
    #[error("unsupported format '.{extension}': format has to be png or jpg")]
    Unsupported { extension: String },
}

/// Errors from decoding a source raster or encoding a tile region
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Source bytes are corrupt or not in the declared format
    #[error("decode error: {message}")]
    DecodeError { message: String },

    /// Region has zero width or zero height
    #[error("empty region ({x0},{y0})-({x1},{y1})")]
    EmptyRegion { x0: u32, y0: u32, x1: u32, y1: u32 },

    /// Region extends past the raster bounds
    #[error("region ({x0},{y0})-({x1},{y1}) exceeds image bounds {width}x{height}")]
    OutOfBounds {
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        width: u32,
        height: u32,
    },

    /// Encoder rejected the tile
    #[error("encode error: {message}")]
    EncodeError { message: String },
}

/// Errors writing the JSON manifest of tile origins
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to produce a single tile file
#[derive(Debug, Error)]
pub enum TileWriteError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal failure of one image's slicing pipeline.
///
/// Every variant is scoped to a single source image; none of them abort the
/// rest of the batch.
#[derive(Debug, Error)]
pub enum SliceError {
    /// Source file could not be opened or read
    #[error("failed to open {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension missing or not png/jpg/jpeg
    #[error("{}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// Source bytes could not be decoded
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// A tile could not be extracted, encoded, or written
    #[error("failed to write tile {}: {source}", .path.display())]
    TileWrite {
        path: PathBuf,
        #[source]
        source: TileWriteError,
    },

    /// Tiles were written but the manifest was not
    #[error("failed to write manifest {}: {source}", .path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    /// The worker task died before producing an outcome
    #[error("worker for {} aborted: {message}", .path.display())]
    Worker { path: PathBuf, message: String },
}

impl SliceError {
    /// Short stable name of the error kind, for logs and reports.
    pub const fn kind(&self) -> &'static str {
        match self {
            SliceError::FileOpen { .. } => "file-open",
            SliceError::Format { .. } => "format",
            SliceError::Decode { .. } => "decode",
            SliceError::TileWrite { .. } => "tile-write",
            SliceError::ManifestWrite { .. } => "manifest-write",
            SliceError::Worker { .. } => "worker",
        }
    }
}

/// Errors that abort the whole batch before any worker is launched
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("error reading input directory {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input directory {} is empty", .path.display())]
    InputEmpty { path: PathBuf },

    #[error("error preparing output directory {}: {message}", .path.display())]
    OutputSetup { path: PathBuf, message: String },
}
