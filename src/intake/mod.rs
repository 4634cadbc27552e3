//! Loading harvested postings from scraper exports.

mod parser;

use crate::triage::domain::JobRecord;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RecordImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for RecordImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordImportError::Io(err) => write!(f, "failed to read posting export: {}", err),
            RecordImportError::Csv(err) => write!(f, "invalid posting CSV data: {}", err),
            RecordImportError::Json(err) => write!(f, "invalid posting JSON data: {}", err),
        }
    }
}

impl std::error::Error for RecordImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordImportError::Io(err) => Some(err),
            RecordImportError::Csv(err) => Some(err),
            RecordImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RecordImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RecordImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for RecordImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Export layout produced by the scrapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    /// Guess from the file extension, falling back to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

pub struct RecordImporter;

impl RecordImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        format: Option<RecordFormat>,
    ) -> Result<Vec<JobRecord>, RecordImportError> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| RecordFormat::from_path(path));
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, format)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: RecordFormat,
    ) -> Result<Vec<JobRecord>, RecordImportError> {
        let records = match format {
            RecordFormat::Csv => parser::parse_csv(reader)?,
            RecordFormat::Json => parser::parse_json(reader)?,
        };
        Ok(records)
    }
}
