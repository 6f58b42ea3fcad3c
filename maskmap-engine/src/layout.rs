//! On-disk layout of uploads, artifacts and the mapping file

use crate::job::JobId;
use std::path::{Path, PathBuf};

/// Directory holding everything the engine writes
///
/// ```text
/// <root>/uploads/{job}_{name}           staging copy, removed after processing
/// <root>/masked_txts/masked_{job}.txt
/// <root>/unmasked_txts/unmasked_{job}.txt
/// <root>/masked_docs/masked_{job}.{ext}
/// <root>/unmasked_docs/unmasked_{job}.{ext}
/// <root>/masking_maps.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// File name of the mapping store
    pub const MAPPING_FILE: &'static str = "masking_maps.json";

    /// Layout rooted at `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates every directory of the layout
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [
            self.uploads_dir(),
            self.masked_texts_dir(),
            self.unmasked_texts_dir(),
            self.masked_docs_dir(),
            self.unmasked_docs_dir(),
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Staging directory for submitted files
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Directory of masked text artifacts
    pub fn masked_texts_dir(&self) -> PathBuf {
        self.root.join("masked_txts")
    }

    /// Directory of restored text artifacts
    pub fn unmasked_texts_dir(&self) -> PathBuf {
        self.root.join("unmasked_txts")
    }

    /// Directory of burned-in paginated documents
    pub fn masked_docs_dir(&self) -> PathBuf {
        self.root.join("masked_docs")
    }

    /// Directory of restored paginated documents
    pub fn unmasked_docs_dir(&self) -> PathBuf {
        self.root.join("unmasked_docs")
    }

    /// Mapping store file
    pub fn mapping_file(&self) -> PathBuf {
        self.root.join(Self::MAPPING_FILE)
    }

    /// Staging path for `file_name` submitted under `job`
    pub fn upload(&self, job: &JobId, file_name: &str) -> PathBuf {
        self.uploads_dir().join(format!("{job}_{file_name}"))
    }

    /// Masked text artifact of `job`
    pub fn masked_text(&self, job: &JobId) -> PathBuf {
        self.masked_texts_dir().join(format!("masked_{job}.txt"))
    }

    /// Restored text artifact of `job`
    pub fn unmasked_text(&self, job: &JobId) -> PathBuf {
        self.unmasked_texts_dir().join(format!("unmasked_{job}.txt"))
    }

    /// Burned-in document of `job`
    pub fn masked_document(&self, job: &JobId, extension: &str) -> PathBuf {
        self.masked_docs_dir()
            .join(format!("masked_{job}.{extension}"))
    }

    /// Restored paginated document of `job`
    pub fn unmasked_document(&self, job: &JobId, extension: &str) -> PathBuf {
        self.unmasked_docs_dir()
            .join(format!("unmasked_{job}.{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_names() {
        let data = DataDir::new("data");
        let job = JobId::parse("1234").unwrap();

        assert_eq!(
            data.masked_text(&job),
            PathBuf::from("data/masked_txts/masked_1234.txt")
        );
        assert_eq!(
            data.unmasked_text(&job),
            PathBuf::from("data/unmasked_txts/unmasked_1234.txt")
        );
        assert_eq!(
            data.upload(&job, "cv.docx"),
            PathBuf::from("data/uploads/1234_cv.docx")
        );
        assert_eq!(data.mapping_file(), PathBuf::from("data/masking_maps.json"));
    }

    #[test]
    fn test_ensure_creates_directories() {
        let dir = TempDir::new().unwrap();
        let data = DataDir::new(dir.path().join("data"));
        data.ensure().unwrap();

        assert!(data.uploads_dir().is_dir());
        assert!(data.masked_texts_dir().is_dir());
        assert!(data.unmasked_texts_dir().is_dir());
        assert!(data.masked_docs_dir().is_dir());
    }
}
