//! Core error types

use thiserror::Error;

/// Errors raised by the masking algorithms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Detector output that does not describe a valid range of the text
    #[error("invalid span [{start}, {end}) over text of length {len}: {reason}")]
    InvalidSpan {
        /// Start offset as reported by the detector
        start: usize,
        /// End offset as reported by the detector
        end: usize,
        /// Length of the text the span refers to
        len: usize,
        /// Which check the span failed
        reason: SpanFault,
    },

    /// Page index past the end of a paginated document
    #[error("page {page} out of range for document with {count} pages")]
    PageOutOfRange {
        /// Requested page index
        page: usize,
        /// Number of pages in the document
        count: usize,
    },
}

/// Reason a span was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanFault {
    /// `start > end`
    Reversed,
    /// `end` lies past the end of the text
    OutOfBounds,
    /// An offset splits a multi-byte character
    NotCharBoundary,
}

impl std::fmt::Display for SpanFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpanFault::Reversed => write!(f, "start is greater than end"),
            SpanFault::OutOfBounds => write!(f, "end is past the end of the text"),
            SpanFault::NotCharBoundary => write!(f, "offset is not on a character boundary"),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
