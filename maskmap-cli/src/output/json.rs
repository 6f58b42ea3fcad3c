//! JSON output formatter

use super::{JobReport, ReportFormatter};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs job reports as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    reports: Vec<JobReport>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            reports: Vec::new(),
        }
    }
}

impl<W: Write> ReportFormatter for JsonFormatter<W> {
    fn report(&mut self, report: &JobReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.reports)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.reports)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
