//! Generate config command implementation

use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "maskmap.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Commented configuration template
pub const TEMPLATE: &str = r#"# maskmap configuration

[storage]
# Uploads, masked and restored artifacts, and masking_maps.json live here
data_dir = "data"

[output]
# Report format for `maskmap mask`: "text" or "json"
format = "text"
pretty_json = true

# Each rule tags every regex match with its entity type.
# Placeholders are numbered per entity type: <PERSON_0>, <PERSON_1>, ...

[[detector.patterns]]
entity_type = "EMAIL_ADDRESS"
pattern = '[\w.+-]+@[\w-]+\.[\w.]*\w'

[[detector.patterns]]
entity_type = "PHONE_NUMBER"
pattern = '\+?\d[\d -]{7,}\d'

# [[detector.patterns]]
# entity_type = "PERSON"
# pattern = '\b(?:Jane Doe|John Smith)\b'
"#;

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            return Err(CliError::ConfigExists(self.output.clone()).into());
        }

        std::fs::write(&self.output, TEMPLATE)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Add detector patterns for the entities you need to mask");
        println!("2. Mask documents with it:");
        println!(
            "   maskmap mask -i input.txt --config {}",
            self.output.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses() {
        let config: CliConfig = toml::from_str(TEMPLATE).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.detector.patterns.len(), 2);
        assert_eq!(config.detector.patterns[0].entity_type, "EMAIL_ADDRESS");
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("maskmap.toml");
        std::fs::write(&output, "keep me").unwrap();

        let args = GenerateConfigArgs {
            output: output.clone(),
            force: false,
        };
        assert!(args.execute().is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");

        let args = GenerateConfigArgs {
            output: output.clone(),
            force: true,
        };
        args.execute().unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), TEMPLATE);
    }
}
