//! Output writers for simulation results.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::metrics::{CsvSummaryRow, SessionMetrics};
use crate::types::OutputFormat;

pub struct OutputWriter {
    jsonl_writer: Option<BufWriter<File>>,
    csv_writer: Option<csv::Writer<BufWriter<File>>>,
    jsonl_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
}

fn create_truncated(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

impl OutputWriter {
    pub fn new(output_dir: &str, format: OutputFormat) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = Path::new(output_dir);
        std::fs::create_dir_all(dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");

        let (jsonl_writer, jsonl_path) = if format.writes_jsonl() {
            let path = dir.join(format!("sessions_{timestamp}.jsonl"));
            let writer = BufWriter::new(create_truncated(&path)?);
            (Some(writer), Some(path))
        } else {
            (None, None)
        };

        let (csv_writer, csv_path) = if format.writes_csv() {
            let path = dir.join(format!("sessions_{timestamp}_summary.csv"));
            // Header comes from the first serialized row.
            let writer = csv::Writer::from_writer(BufWriter::new(create_truncated(&path)?));
            (Some(writer), Some(path))
        } else {
            (None, None)
        };

        Ok(Self {
            jsonl_writer,
            csv_writer,
            jsonl_path,
            csv_path,
        })
    }

    pub fn write_session(
        &mut self,
        metrics: &SessionMetrics,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(writer) = self.jsonl_writer.as_mut() {
            serde_json::to_writer(&mut *writer, metrics)?;
            writer.write_all(b"\n")?;
        }

        if let Some(writer) = self.csv_writer.as_mut() {
            writer.serialize(CsvSummaryRow::from(metrics))?;
        }

        Ok(())
    }

    pub fn finish(mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(writer) = self.jsonl_writer.as_mut() {
            writer.flush()?;
        }
        if let Some(writer) = self.csv_writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn output_paths(&self) -> (Option<&PathBuf>, Option<&PathBuf>) {
        (self.jsonl_path.as_ref(), self.csv_path.as_ref())
    }
}
