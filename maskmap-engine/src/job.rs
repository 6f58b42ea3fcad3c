//! Job identity

use maskmap_core::UnmaskingMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Opaque identifier linking an upload, its artifacts and its mapping
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// A fresh random (UUIDv4) identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an identifier supplied by a caller.
    ///
    /// The value is not interpreted; unknown ids surface later as
    /// `MappingNotFound`. Returns `None` for blank input.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// The identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Files produced for a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobArtifacts {
    /// Masked text written for the job
    pub masked: Option<PathBuf>,
    /// Restored text written for the job
    pub unmasked: Option<PathBuf>,
    /// Burned-in paginated document
    pub masked_document: Option<PathBuf>,
    /// Restored paginated document
    pub unmasked_document: Option<PathBuf>,
}

/// A masking job and its stored mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Job identifier
    pub id: JobId,
    /// Placeholder to original table
    pub unmasking_map: UnmaskingMap,
    /// Artifact locations
    pub artifacts: JobArtifacts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = JobId::generate();
        let b = JobId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_parse_is_opaque() {
        assert_eq!(JobId::parse(" not-a-uuid ").unwrap().as_str(), "not-a-uuid");
        assert!(JobId::parse("   ").is_none());
    }
}
