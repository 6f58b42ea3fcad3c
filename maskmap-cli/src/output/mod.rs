//! Output formatting module

use crate::error::CliError;
use anyhow::Result;
use maskmap_engine::MaskedDocument;
use serde::Serialize;
use std::path::PathBuf;

/// Trait for job report formatters
pub trait ReportFormatter {
    /// Format and output one finished job
    fn report(&mut self, report: &JobReport) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Summary of one masked document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Job id to pass to `unmask` and `show`
    pub job_id: String,
    /// Submitted file
    pub source: PathBuf,
    /// Masked text artifact
    pub masked_path: PathBuf,
    /// Distinct placeholders allocated
    pub placeholders: usize,
}

impl From<&MaskedDocument> for JobReport {
    fn from(document: &MaskedDocument) -> Self {
        Self {
            job_id: document.job_id.to_string(),
            source: document.source.clone(),
            masked_path: document.masked_path.clone(),
            placeholders: document.unmasking_map.len(),
        }
    }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One tab-separated line per job
    Text,
    /// JSON array of job reports
    Json,
}

impl OutputFormat {
    /// Parse the `output.format` configuration value
    pub fn from_config(value: &str) -> Result<Self> {
        <Self as clap::ValueEnum>::from_str(value, true)
            .map_err(|_| CliError::InvalidFormat(value.to_string()).into())
    }

    /// Formatter writing to stdout
    pub fn formatter(self, pretty_json: bool) -> Box<dyn ReportFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::stdout()),
            OutputFormat::Json => Box::new(JsonFormatter::new(std::io::stdout(), pretty_json)),
        }
    }
}
