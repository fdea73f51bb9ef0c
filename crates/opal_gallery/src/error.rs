//! Error types for opal_gallery

use thiserror::Error;

/// Errors from the strict (non-clamping) gallery entry points
///
/// The stateful entry points correct bad inputs by clamping; these variants
/// exist for the `try_` variants of the window math, for callers that prefer
/// rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    /// Page size must be at least 1
    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),

    /// Active index outside the collection
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for opal_gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;
