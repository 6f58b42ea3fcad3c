//! Error handling for the CLI application

use std::fmt;
use std::path::PathBuf;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Blank job id on the command line
    InvalidJobId(String),
    /// Neither a detections file nor configured patterns
    NoDetector,
    /// A detections file applies to exactly one document
    DetectionsNeedSingleInput(usize),
    /// Unknown report format in the configuration
    InvalidFormat(String),
    /// Refusing to overwrite a file
    ConfigExists(PathBuf),
    /// Some jobs of a batch failed
    JobsFailed {
        /// Failed jobs
        failed: usize,
        /// Jobs attempted
        total: usize,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidJobId(id) => write!(f, "Invalid job id: '{id}'"),
            CliError::NoDetector => write!(
                f,
                "No detector configured: pass --detections or add [[detector.patterns]] to the config"
            ),
            CliError::DetectionsNeedSingleInput(count) => write!(
                f,
                "A detections file applies to a single document, but {count} files matched"
            ),
            CliError::InvalidFormat(format) => write!(f, "Unknown output format: {format}"),
            CliError::ConfigExists(path) => write!(
                f,
                "{} already exists (use --force to overwrite)",
                path.display()
            ),
            CliError::JobsFailed { failed, total } => {
                write!(f, "{failed} of {total} documents failed")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_job_id_display() {
        let error = CliError::InvalidJobId(" ".to_string());
        assert_eq!(error.to_string(), "Invalid job id: ' '");
    }

    #[test]
    fn test_jobs_failed_display() {
        let error = CliError::JobsFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(error.to_string(), "2 of 5 documents failed");
    }

    #[test]
    fn test_config_exists_display() {
        let error = CliError::ConfigExists(PathBuf::from("maskmap.toml"));
        assert_eq!(
            error.to_string(),
            "maskmap.toml already exists (use --force to overwrite)"
        );
    }

    #[test]
    fn test_error_converts_into_anyhow() {
        let result: CliResult<()> = Err(CliError::NoDetector.into());
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
        assert!(err.to_string().starts_with("No detector configured"));
    }
}
