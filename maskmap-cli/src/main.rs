//! maskmap command-line entry point

use anyhow::Result;
use clap::Parser;
use maskmap_cli::commands::Commands;

/// Reversible PII masking for text documents
#[derive(Debug, Parser)]
#[command(name = "maskmap", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
