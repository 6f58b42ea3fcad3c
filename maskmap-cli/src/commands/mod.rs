//! CLI command implementations

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::FileReader;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use maskmap_engine::{
    file_backed_service, DataDir, Detector, JobId, JsonFileStore, MaskingService, PatternDetector,
    StaticDetector,
};
use std::path::PathBuf;
use std::sync::Arc;

pub mod generate_config;
pub mod mask;
pub mod redact;
pub mod show;
pub mod unmask;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mask documents and store their placeholder mappings
    Mask(mask::MaskArgs),

    /// Restore the masked artifact of a job
    Unmask(unmask::UnmaskArgs),

    /// Burn placeholders into a paginated text document
    Redact(redact::RedactArgs),

    /// Print the stored mapping of a job
    Show(show::ShowArgs),

    /// Write a commented configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Mask(args) => args.execute(),
            Commands::Unmask(args) => args.execute(),
            Commands::Redact(args) => args.execute(),
            Commands::Show(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}

/// Options shared by every command that touches the data directory
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Configuration file (default: ./maskmap.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for uploads, artifacts and the mapping file
    #[arg(long, value_name = "DIR", env = "MASKMAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Suppress progress and log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when commands run in-process
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }

    /// Load the configuration file, if any
    pub fn load_config(&self) -> Result<CliConfig> {
        CliConfig::load(self.config.as_deref())
    }

    /// Data directory, with the command line taking precedence
    pub fn data_dir(&self, config: &CliConfig) -> DataDir {
        match &self.data_dir {
            Some(dir) => DataDir::new(dir),
            None => DataDir::new(&config.storage.data_dir),
        }
    }

    /// File-backed service for commands that never detect
    pub fn restore_service(&self, config: &CliConfig) -> MaskingService<JsonFileStore> {
        file_backed_service(Arc::new(StaticDetector::default()), self.data_dir(config))
    }
}

/// Where detections come from
#[derive(Debug, Clone, Default, Args)]
pub struct DetectorArgs {
    /// JSON array of `{start, end, entity_type}` detections to use instead of
    /// the configured patterns
    #[arg(short, long, value_name = "FILE")]
    pub detections: Option<PathBuf>,

    /// Treat detection offsets as character positions instead of bytes
    #[arg(long, requires = "detections")]
    pub char_offsets: bool,
}

impl DetectorArgs {
    /// Build the detector for this run
    pub fn build(&self, config: &CliConfig) -> Result<Arc<dyn Detector>> {
        if let Some(path) = &self.detections {
            let json = FileReader::read_text(path)?;
            let detector = StaticDetector::from_json(&json, self.char_offsets)
                .with_context(|| format!("Invalid detections file: {}", path.display()))?;
            return Ok(Arc::new(detector));
        }

        if config.detector.patterns.is_empty() {
            return Err(CliError::NoDetector.into());
        }
        let detector = PatternDetector::new(&config.detector.patterns)
            .context("Invalid detector pattern in configuration")?;
        log::debug!("Loaded {} detector patterns", detector.len());
        Ok(Arc::new(detector))
    }
}

/// Parse a job id given on the command line
pub fn parse_job_id(value: &str) -> Result<JobId> {
    JobId::parse(value).ok_or_else(|| CliError::InvalidJobId(value.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskmap_engine::PatternRule;

    #[test]
    fn test_data_dir_flag_overrides_config() {
        let mut config = CliConfig::default();
        config.storage.data_dir = PathBuf::from("from-config");

        let args = CommonArgs::default();
        assert_eq!(args.data_dir(&config), DataDir::new("from-config"));

        let args = CommonArgs {
            data_dir: Some(PathBuf::from("from-flag")),
            ..CommonArgs::default()
        };
        assert_eq!(args.data_dir(&config), DataDir::new("from-flag"));
    }

    #[test]
    fn test_detector_requires_a_source() {
        let err = DetectorArgs::default()
            .build(&CliConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("No detector configured"));
    }

    #[test]
    fn test_detector_from_config_patterns() {
        let mut config = CliConfig::default();
        config.detector.patterns.push(PatternRule {
            entity_type: "PERSON".to_string(),
            pattern: "John".to_string(),
        });

        let detector = DetectorArgs::default().build(&config).unwrap();
        let spans = detector.detect("Hi John").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].entity_type, "PERSON");
    }

    #[test]
    fn test_parse_job_id_rejects_blank() {
        assert!(parse_job_id("  ").is_err());
        assert_eq!(parse_job_id("abc").unwrap().as_str(), "abc");
    }
}
