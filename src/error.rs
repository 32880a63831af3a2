//! Error types for origin hash computation.

use std::io;
use thiserror::Error;

/// Errors surfaced by the origin hash computations.
///
/// Every variant is terminal for the computation that raised it: no partial
/// digest is ever returned, and the caller must re-invoke the whole
/// computation to retry.
#[derive(Debug, Error)]
pub enum OriginError {
    /// Source path missing, inaccessible, or not the expected type.
    #[error("unreadable source: {0}")]
    Io(#[from] io::Error),

    /// Archive container cannot be opened, its index is malformed, or its
    /// format is not recognized.
    #[error("unreadable archive: {0}")]
    Archive(String),

    /// A content stream opened successfully but failed during a read.
    #[error("content stream failed: {0}")]
    Content(io::Error),

    /// A digest string passed in for verification is not valid hex of the
    /// expected length.
    #[error("invalid digest string: {0}")]
    InvalidDigest(String),
}

impl From<zip::result::ZipError> for OriginError {
    fn from(err: zip::result::ZipError) -> Self {
        OriginError::Archive(err.to_string())
    }
}
