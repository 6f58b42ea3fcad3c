//! Job orchestration for reversible PII masking
//!
//! This crate wires the algorithms of `maskmap-core` to the outside world:
//! detectors, document extractors, the mapping store and the artifact
//! directory. Every collaborator is passed in explicitly; nothing here is
//! global.

#![warn(missing_docs)]

pub mod detect;
pub mod error;
pub mod extract;
pub mod job;
pub mod layout;
pub mod service;
pub mod store;

// Re-export key types
pub use detect::{Detector, PatternDetector, PatternRule, StaticDetector};
pub use error::{EngineError, Result};
pub use extract::{DefaultExtractor, DocumentFormat, TextExtractor};
pub use job::{Job, JobArtifacts, JobId};
pub use layout::DataDir;
pub use service::{MaskedDocument, MaskedText, MaskingService, RedactedDocument, UnmaskedDocument};
pub use store::{JsonFileStore, MappingStore, MappingTable, MemoryStore, SharedStore};

// Re-export from core for convenience
pub use maskmap_core::{BurnInReport, DetectedSpan, UnmaskingMap};

use std::sync::Arc;

/// Service backed by a JSON mapping file inside `data_dir`
pub fn file_backed_service(
    detector: Arc<dyn Detector>,
    data_dir: DataDir,
) -> MaskingService<JsonFileStore> {
    let store = SharedStore::new(JsonFileStore::new(data_dir.mapping_file()));
    MaskingService::new(detector, Arc::new(DefaultExtractor), store, data_dir)
}
