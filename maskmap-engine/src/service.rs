//! Masking service
//!
//! Ties an injected detector, extractor and mapping store to the core
//! algorithms. Each call is one job; jobs share nothing but the store.

use crate::{
    detect::Detector,
    error::{EngineError, Result},
    extract::{DocumentFormat, TextExtractor},
    job::{Job, JobArtifacts, JobId},
    layout::DataDir,
    store::{MappingStore, SharedStore},
};
use maskmap_core::{burn_in, BurnInReport, Masked, TextPages, TextTransformer, UnmaskingMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A masked text and its job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    /// Job the mapping was stored under
    pub job_id: JobId,
    /// Text with every detected literal replaced
    pub masked_text: String,
    /// Stored placeholder table
    pub unmasking_map: UnmaskingMap,
}

/// A masked upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedDocument {
    /// Job the mapping was stored under
    pub job_id: JobId,
    /// Submitted file
    pub source: PathBuf,
    /// Masked text artifact
    pub masked_path: PathBuf,
    /// Stored placeholder table
    pub unmasking_map: UnmaskingMap,
}

/// A restored text artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmaskedDocument {
    /// Job that was restored
    pub job_id: JobId,
    /// Restored text
    pub text: String,
    /// Restored text artifact
    pub unmasked_path: PathBuf,
}

/// Result of a burn-in pass over a paginated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedDocument {
    /// Job the mapping belongs to
    pub job_id: JobId,
    /// Pages and regions touched
    pub report: BurnInReport,
    /// Written document, `None` when nothing changed
    pub output: Option<PathBuf>,
    /// Placeholder table used for the pass
    pub unmasking_map: UnmaskingMap,
}

/// Removes a staged upload when dropped
struct StagedUpload(PathBuf);

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            log::debug!("Could not remove staged upload {}: {}", self.0.display(), e);
        }
    }
}

/// Entry point for masking and unmasking jobs
pub struct MaskingService<S: MappingStore> {
    detector: Arc<dyn Detector>,
    extractor: Arc<dyn TextExtractor>,
    store: SharedStore<S>,
    data_dir: DataDir,
}

impl<S: MappingStore> MaskingService<S> {
    /// Create a service from its collaborators
    pub fn new(
        detector: Arc<dyn Detector>,
        extractor: Arc<dyn TextExtractor>,
        store: SharedStore<S>,
        data_dir: DataDir,
    ) -> Self {
        Self {
            detector,
            extractor,
            store,
            data_dir,
        }
    }

    /// Artifact layout used by this service
    pub fn data_dir(&self) -> &DataDir {
        &self.data_dir
    }

    /// The shared mapping store
    pub fn store(&self) -> &SharedStore<S> {
        &self.store
    }

    fn detect_and_mask(&self, text: &str) -> Result<Masked> {
        let spans = self.detector.detect(text)?;
        log::debug!("Detector reported {} spans", spans.len());

        let masked = maskmap_core::mask(text, &spans)?;
        log::debug!(
            "Kept {} spans, allocated {} placeholders",
            masked.reduced.len(),
            masked.allocation.len()
        );
        Ok(masked)
    }

    /// Masks `text` and stores its mapping under a new job.
    pub fn mask_text(&self, text: &str) -> Result<MaskedText> {
        let masked = self.detect_and_mask(text)?;
        let job_id = JobId::generate();
        self.store.put(&job_id, masked.allocation.unmasking.clone())?;
        log::info!("Masked text as job {}", job_id);

        Ok(MaskedText {
            job_id,
            masked_text: masked.text,
            unmasking_map: masked.allocation.unmasking,
        })
    }

    /// Extracts, masks and stores one uploaded document.
    ///
    /// The masked text is written to the masked artifact directory. A
    /// failure at any stage leaves neither a stored mapping nor an artifact,
    /// and the staging copy is always removed.
    pub fn mask_file(&self, path: &Path) -> Result<MaskedDocument> {
        let format = DocumentFormat::from_path(path)?;
        let job_id = JobId::generate();
        self.data_dir.ensure()?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("upload.{}", format.extension()));
        let staged = StagedUpload(self.data_dir.upload(&job_id, &file_name));
        std::fs::copy(path, &staged.0).map_err(|source| EngineError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let text = self.extractor.extract(&staged.0, format)?;
        if text.trim().is_empty() {
            return Err(EngineError::EmptyDocument {
                path: path.to_path_buf(),
            });
        }

        let masked = self.detect_and_mask(&text)?;
        let masked_path = self.data_dir.masked_text(&job_id);
        std::fs::write(&masked_path, &masked.text)?;

        if let Err(e) = self.store.put(&job_id, masked.allocation.unmasking.clone()) {
            let _ = std::fs::remove_file(&masked_path);
            return Err(e);
        }

        log::info!(
            "Masked {} as job {} ({} placeholders)",
            path.display(),
            job_id,
            masked.allocation.len()
        );
        Ok(MaskedDocument {
            job_id,
            source: path.to_path_buf(),
            masked_path,
            unmasking_map: masked.allocation.unmasking,
        })
    }

    /// Masks several documents, each as its own job.
    ///
    /// Results keep the order of `paths`.
    pub fn mask_files(&self, paths: &[PathBuf]) -> Vec<Result<MaskedDocument>> {
        self.mask_files_with(paths, |_, _| {})
    }

    /// Like [`mask_files`](Self::mask_files), calling `on_done` as each job
    /// finishes. With the `parallel` feature the callback runs on worker
    /// threads in completion order.
    pub fn mask_files_with<F>(&self, paths: &[PathBuf], on_done: F) -> Vec<Result<MaskedDocument>>
    where
        F: Fn(&Path, &Result<MaskedDocument>) + Sync,
    {
        let run = |path: &PathBuf| {
            let result = self.mask_file(path);
            on_done(path, &result);
            result
        };

        #[cfg(feature = "parallel")]
        {
            paths.par_iter().map(run).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            paths.iter().map(run).collect()
        }
    }

    /// Restores `masked` with the mapping stored for `job_id`.
    pub fn unmask_text(&self, job_id: &JobId, masked: &str) -> Result<String> {
        let map = self.store.get(job_id)?;
        Ok(TextTransformer::unmask(masked, &map).text)
    }

    /// Restores the masked artifact of `job_id` and writes the result.
    pub fn unmask_job(&self, job_id: &JobId) -> Result<UnmaskedDocument> {
        let masked_path = self.data_dir.masked_text(job_id);
        let masked = std::fs::read_to_string(&masked_path).map_err(|source| {
            EngineError::SourceUnreadable {
                path: masked_path.clone(),
                source,
            }
        })?;

        let text = self.unmask_text(job_id, &masked)?;
        let unmasked_path = self.data_dir.unmasked_text(job_id);
        self.data_dir.ensure()?;
        std::fs::write(&unmasked_path, &text)?;

        log::info!("Restored job {}", job_id);
        Ok(UnmaskedDocument {
            job_id: job_id.clone(),
            text,
            unmasked_path,
        })
    }

    /// Masks a paginated text document by burning replacements into each
    /// page.
    ///
    /// Detection runs once over all pages joined by newlines. The masked
    /// copy is written only if something changed; the mapping is stored in
    /// either case.
    pub fn redact_pages(&self, path: &Path) -> Result<RedactedDocument> {
        let mut document = read_pages(path)?;
        let text = document.pages().join("\n");
        let masked = self.detect_and_mask(&text)?;

        let report = burn_in(&mut document, &masked.allocation.masking)?;
        let job_id = JobId::generate();
        let output = if report.is_unchanged() {
            log::info!("No replacements made in {}", path.display());
            None
        } else {
            self.data_dir.ensure()?;
            let output = self.data_dir.masked_document(&job_id, "txt");
            std::fs::write(&output, document.to_text())?;
            Some(output)
        };

        if let Err(e) = self.store.put(&job_id, masked.allocation.unmasking.clone()) {
            if let Some(output) = &output {
                let _ = std::fs::remove_file(output);
            }
            return Err(e);
        }

        Ok(RedactedDocument {
            job_id,
            report,
            output,
            unmasking_map: masked.allocation.unmasking,
        })
    }

    /// Restores a burned-in paginated document with the mapping of `job_id`.
    pub fn restore_pages(&self, job_id: &JobId, path: &Path) -> Result<RedactedDocument> {
        let map = self.store.get(job_id)?;
        let mut document = read_pages(path)?;

        let report = burn_in(&mut document, &map.to_substitutions())?;
        let output = if report.is_unchanged() {
            None
        } else {
            self.data_dir.ensure()?;
            let output = self.data_dir.unmasked_document(job_id, "txt");
            std::fs::write(&output, document.to_text())?;
            Some(output)
        };

        Ok(RedactedDocument {
            job_id: job_id.clone(),
            report,
            output,
            unmasking_map: map,
        })
    }

    /// Stored mapping and existing artifacts of `job_id`
    pub fn lookup(&self, job_id: &JobId) -> Result<Job> {
        let unmasking_map = self.store.get(job_id)?;
        let existing = |path: PathBuf| path.exists().then_some(path);

        Ok(Job {
            id: job_id.clone(),
            unmasking_map,
            artifacts: JobArtifacts {
                masked: existing(self.data_dir.masked_text(job_id)),
                unmasked: existing(self.data_dir.unmasked_text(job_id)),
                masked_document: existing(self.data_dir.masked_document(job_id, "txt")),
                unmasked_document: existing(self.data_dir.unmasked_document(job_id, "txt")),
            },
        })
    }
}

fn read_pages(path: &Path) -> Result<TextPages> {
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TextPages::parse(&text))
}
