//! Mask command implementation

use super::{CommonArgs, DetectorArgs};
use crate::error::CliError;
use crate::input::resolve_patterns;
use crate::output::{JobReport, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use maskmap_engine::file_backed_service;

/// Arguments for the mask command
#[derive(Debug, Args)]
pub struct MaskArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Output format (default: from configuration, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl MaskArgs {
    /// Execute the mask command
    pub fn execute(&self) -> Result<()> {
        self.common.init_logging();
        log::debug!("Arguments: {:?}", self);

        let config = self.common.load_config()?;
        let files = resolve_patterns(&self.input)?;
        if self.detector.detections.is_some() && files.len() > 1 {
            return Err(CliError::DetectionsNeedSingleInput(files.len()).into());
        }

        let detector = self.detector.build(&config)?;
        let service = file_backed_service(detector, self.common.data_dir(&config));
        log::info!("Masking {} files", files.len());

        let mut progress = ProgressReporter::new(self.common.quiet || files.len() < 2);
        progress.init_files(files.len() as u64);
        let results = service.mask_files_with(&files, |path, _| {
            progress.file_completed(&path.display().to_string());
        });
        progress.finish();

        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_config(&config.output.format)?,
        };
        let mut formatter = format.formatter(config.output.pretty_json);

        let mut failed = 0;
        for (path, result) in files.iter().zip(results) {
            match result {
                Ok(document) => formatter.report(&JobReport::from(&document))?,
                Err(e) => {
                    failed += 1;
                    eprintln!("Error: {}: {}", path.display(), e);
                }
            }
        }
        formatter.finish()?;

        if failed > 0 {
            return Err(CliError::JobsFailed {
                failed,
                total: files.len(),
            }
            .into());
        }
        Ok(())
    }
}
