//! Error types for the pattern editor core.
//!
//! Expected conditions (crop prevention, malformed imports, an unavailable
//! storage sink) are ordinary values here, never panics. The binary and the
//! terminal editor wrap these in `anyhow` at their boundary.

use thiserror::Error;

/// A grid was built from rows that are not a `width × height` rectangle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridShapeError {
    #[error("grid has {actual} rows, expected {expected}")]
    RowCount { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// A resize would have discarded painted cells.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("resize would crop painted content")]
pub struct CropRejected;

/// Why an edge-directed resize produced no new grid.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeResizeError {
    /// Shrinking that edge would cross into painted content.
    #[error("resize would crop painted content")]
    CropRejected,

    /// The clamped size equals the current size (already at a bound).
    #[error("grid is already at its size limit on that edge")]
    Unchanged,
}

impl From<CropRejected> for EdgeResizeError {
    fn from(_: CropRejected) -> Self {
        EdgeResizeError::CropRejected
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    #[error("colour index {index} is out of range (palette has {len} colours)")]
    OutOfRange { index: usize, len: usize },

    #[error("the pattern needs at least one colour")]
    LastColor,

    #[error("palette is full ({max} colours)")]
    Full { max: usize },

    #[error("cannot merge a colour into itself")]
    SameColor,
}

/// Structural problems with an imported or persisted document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing or unsupported format version")]
    UnsupportedVersion,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has the wrong type")]
    WrongType { field: &'static str },

    #[error(transparent)]
    Shape(#[from] GridShapeError),

    #[error("invalid colour `{0}`")]
    InvalidColor(String),
}

/// Failure to turn a file's contents into a pattern document.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The bytes are not JSON at all.
    #[error("file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid pattern file: {0}")]
    Invalid(#[from] ValidationError),
}

/// Result alias for storage sinks.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored state is unreadable: {0}")]
    Import(#[from] ImportError),

    #[error("failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage corruption: {0}")]
    Corruption(String),

    #[error("storage backend `{0}` is unavailable")]
    Unavailable(String),
}
