//! Engine error types
//!
//! Wraps [`CoreError`] and adds the failures of the collaborators around the
//! core: extraction, storage and artifact I/O.

use maskmap_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed detector output or paged-document misuse
    #[error("core algorithm error: {0}")]
    Core(#[from] CoreError),

    /// File type with no registered extractor
    #[error("unsupported file type: .{extension} (expected pdf, txt or docx)")]
    UnsupportedFormat {
        /// Extension of the rejected file, lowercased
        extension: String,
    },

    /// The extractor could not read the document
    #[error("error extracting text from '{path}': {reason}")]
    ExtractionFailure {
        /// Document that failed
        path: PathBuf,
        /// Extractor message
        reason: String,
    },

    /// Extraction succeeded but produced no text
    #[error("no text content found in '{path}'")]
    EmptyDocument {
        /// Document that was empty
        path: PathBuf,
    },

    /// A transform stage could not open its input
    #[error("cannot read source '{path}': {source}")]
    SourceUnreadable {
        /// Input that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No stored mapping for the requested job
    #[error("unmasking map not found for job {job_id}")]
    MappingNotFound {
        /// Requested job id
        job_id: String,
    },

    /// A mapping already exists for this job; jobs are write-once
    #[error("job {job_id} already has a stored mapping")]
    JobExists {
        /// Conflicting job id
        job_id: String,
    },

    /// The detector failed
    #[error("detector error: {0}")]
    Detector(String),

    /// Invalid detector or engine configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
