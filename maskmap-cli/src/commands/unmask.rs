//! Unmask command implementation

use super::{parse_job_id, CommonArgs};
use crate::input::FileReader;
use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the unmask command
#[derive(Debug, Args)]
pub struct UnmaskArgs {
    /// Job id printed by `maskmap mask`
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,

    /// Restore this masked text instead of the job's masked artifact
    #[arg(short, long, value_name = "FILE")]
    pub masked: Option<PathBuf>,

    /// Also write the restored text to FILE
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl UnmaskArgs {
    /// Execute the unmask command
    pub fn execute(&self) -> Result<()> {
        self.common.init_logging();

        let config = self.common.load_config()?;
        let job_id = parse_job_id(&self.job_id)?;
        let service = self.common.restore_service(&config);

        let text = match &self.masked {
            Some(path) => {
                let masked = FileReader::read_text(path)?;
                service
                    .unmask_text(&job_id, &masked)
                    .with_context(|| format!("Failed to unmask {}", path.display()))?
            }
            None => {
                let restored = service
                    .unmask_job(&job_id)
                    .with_context(|| format!("Failed to unmask job {job_id}"))?;
                log::info!("Wrote {}", restored.unmasked_path.display());
                restored.text
            }
        };

        if let Some(output) = &self.output {
            FileReader::write_text(output, &text)?;
        }

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(stdout)?;
        }
        stdout.flush()?;
        Ok(())
    }
}
