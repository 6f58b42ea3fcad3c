//! Redact command implementation

use super::{parse_job_id, CommonArgs, DetectorArgs};
use anyhow::{Context, Result};
use clap::Args;
use maskmap_engine::{file_backed_service, RedactedDocument};
use std::path::PathBuf;

/// Arguments for the redact command
///
/// Pages of the input are separated by form feeds.
#[derive(Debug, Args)]
pub struct RedactArgs {
    /// Paginated text document
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Restore a document previously redacted under JOB_ID
    #[arg(long, value_name = "JOB_ID", conflicts_with = "detections")]
    pub restore: Option<String>,

    #[command(flatten)]
    pub detector: DetectorArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl RedactArgs {
    /// Execute the redact command
    pub fn execute(&self) -> Result<()> {
        self.common.init_logging();

        let config = self.common.load_config()?;
        let redacted = match &self.restore {
            Some(job_id) => {
                let job_id = parse_job_id(job_id)?;
                self.common
                    .restore_service(&config)
                    .restore_pages(&job_id, &self.input)
            }
            None => {
                let detector = self.detector.build(&config)?;
                file_backed_service(detector, self.common.data_dir(&config))
                    .redact_pages(&self.input)
            }
        }
        .with_context(|| format!("Failed to process {}", self.input.display()))?;

        print_summary(&redacted);
        Ok(())
    }
}

fn print_summary(redacted: &RedactedDocument) {
    println!("Job: {}", redacted.job_id);
    match &redacted.output {
        Some(output) => {
            println!(
                "Replaced {} regions on {} pages",
                redacted.report.replacements, redacted.report.pages_modified
            );
            println!("Output: {}", output.display());
        }
        None => println!("No changes were made to the document"),
    }
}
