use crate::error::Result;
use crate::models::Finding;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Writes aggregated findings to stdout or a file
pub struct OutputHandler {
    format: OutputFormat,
    writer: Box<dyn Write + Send>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One pretty-printed JSON array
    Json,
    /// One JSON object per line
    Jsonl,
    /// One row per finding with a fixed column set
    Csv,
    /// Human readable lines
    Console,
}

const CSV_HEADER: [&str; 8] = [
    "kind",
    "ip",
    "count",
    "window_minutes",
    "method",
    "reason",
    "path",
    "usernames",
];

/// Flattened finding; columns a detector does not fill stay empty
#[derive(Debug, Default, Serialize)]
struct CsvRow<'a> {
    kind: &'a str,
    ip: &'a str,
    count: Option<usize>,
    window_minutes: Option<u32>,
    method: Option<&'a str>,
    reason: Option<&'static str>,
    path: Option<&'a str>,
    usernames: Option<String>,
}

impl<'a> From<&'a Finding> for CsvRow<'a> {
    fn from(finding: &'a Finding) -> Self {
        let row = CsvRow {
            kind: finding.kind(),
            ip: finding.ip(),
            ..CsvRow::default()
        };
        match finding {
            Finding::BruteForce(f) => CsvRow {
                count: Some(f.failed_count),
                ..row
            },
            Finding::Intrusion(f) => CsvRow {
                count: Some(f.attempts),
                window_minutes: Some(f.window_minutes),
                ..row
            },
            Finding::UserEnumeration(f) => CsvRow {
                count: Some(f.usernames.len()),
                usernames: Some(f.usernames.iter().cloned().collect::<Vec<_>>().join(";")),
                ..row
            },
            Finding::PortScan(f) => CsvRow {
                count: Some(f.distinct_ports),
                window_minutes: Some(f.window_minutes),
                ..row
            },
            Finding::Dos(f) => CsvRow {
                count: Some(f.request_count),
                ..row
            },
            Finding::SuspiciousHttpMethod(f) => CsvRow {
                method: Some(f.method.as_str()),
                path: Some(f.path.as_str()),
                ..row
            },
            Finding::WebAttack(f) => CsvRow {
                reason: Some(f.reason.label()),
                path: Some(f.path.as_str()),
                ..row
            },
        }
    }
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            "csv" => OutputFormat::Csv,
            "console" => OutputFormat::Console,
            other => {
                log::warn!("Unknown output format '{}', falling back to console", other);
                OutputFormat::Console
            }
        }
    }
}

impl OutputHandler {
    /// Create a handler writing to `file_path`, or stdout when absent
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self> {
        let writer: Box<dyn Write + Send> = match file_path {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(io::stdout()),
        };
        Ok(OutputHandler { format, writer })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a batch of findings
    pub fn write_findings(&mut self, findings: &[Finding]) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, findings)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Jsonl => {
                for finding in findings {
                    serde_json::to_writer(&mut self.writer, finding)?;
                    writeln!(self.writer)?;
                }
            }
            OutputFormat::Csv => {
                let mut csv_writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(&mut self.writer);
                csv_writer.write_record(CSV_HEADER)?;
                for finding in findings {
                    csv_writer.serialize(CsvRow::from(finding))?;
                }
                csv_writer.flush()?;
            }
            OutputFormat::Console => {
                if findings.is_empty() {
                    writeln!(self.writer, "No suspicious activity detected.")?;
                }
                for finding in findings {
                    writeln!(self.writer, "[{}] {}", finding.detector_name(), finding)?;
                }
            }
        }
        self.flush()
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
