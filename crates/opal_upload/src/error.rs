//! Error types for opal_upload

use thiserror::Error;

use crate::file::format_size;

/// Why a file was refused during selection
///
/// Messages are ready to surface to the user, with sizes already formatted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The file matches no accept rule
    #[error("{name}: unsupported file type")]
    UnsupportedType { name: String },

    /// The file exceeds the per-file size cap
    #[error("{name}: file is {}, limit is {}", format_size(*.size), format_size(*.limit))]
    TooLarge { name: String, size: u64, limit: u64 },

    /// Accepting the file would exceed the pending-file cap
    #[error("file limit is {limit}")]
    LimitExceeded { limit: usize },

    /// A pending file already has this name and size
    #[error("{name}: already selected")]
    Duplicate { name: String },
}

/// Why a controller operation was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// A batch is with the transport; selection edits must wait
    #[error("an upload is in progress")]
    Busy,

    /// No files are pending
    #[error("no files are ready to upload")]
    NotReady,

    /// No pending file at the given index
    #[error("no pending file at index {index} (have {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Transport-level failure starting a batch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Result type for opal_upload operations
pub type Result<T> = std::result::Result<T, UploadError>;
