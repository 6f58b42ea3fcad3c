//! Plain text output formatter

use super::{JobReport, ReportFormatter};
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - one tab-separated line per job
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ReportFormatter for TextFormatter<W> {
    fn report(&mut self, report: &JobReport) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{} placeholders",
            report.job_id,
            report.source.display(),
            report.masked_path.display(),
            report.placeholders
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
