//! Show command implementation

use super::{parse_job_id, CommonArgs};
use anyhow::{Context, Result};
use clap::Args;
use maskmap_engine::{JobArtifacts, UnmaskingMap};
use serde::Serialize;

/// Arguments for the show command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Job id printed by `maskmap mask`
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Serialize)]
struct JobView<'a> {
    job_id: &'a str,
    mapping: &'a UnmaskingMap,
    artifacts: &'a JobArtifacts,
}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self) -> Result<()> {
        self.common.init_logging();

        let config = self.common.load_config()?;
        let job_id = parse_job_id(&self.job_id)?;
        let job = self
            .common
            .restore_service(&config)
            .lookup(&job_id)
            .with_context(|| format!("Failed to look up job {job_id}"))?;

        let view = JobView {
            job_id: job.id.as_str(),
            mapping: &job.unmasking_map,
            artifacts: &job.artifacts,
        };
        let json = if config.output.pretty_json {
            serde_json::to_string_pretty(&view)?
        } else {
            serde_json::to_string(&view)?
        };
        println!("{json}");
        Ok(())
    }
}
