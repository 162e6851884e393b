//! Streaming delimited input.
//!
//! Records come straight from a `csv` reader as raw text so the profiler's own
//! type inference sees the field values untouched. Blank lines are skipped,
//! rows may carry any number of fields and bytes that are not valid UTF-8 are
//! replaced with U+FFFD. An empty field, quoted or not, is a missing value.

use crate::error::{ProfilingError, Result, ResultExt};
use crate::types::FileFormat;
use csv::{ByteRecord, Reader, ReaderBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a profile's data came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// Base name of the input file.
    pub filename: String,
    /// Size in bytes.
    pub file_size: u64,
    pub format: FileFormat,
}

impl SourceInfo {
    pub fn new(filename: impl Into<String>, file_size: u64, format: FileFormat) -> Self {
        Self {
            filename: filename.into(),
            file_size,
            format,
        }
    }

    /// Describe a path without requiring it to be readable. The size falls
    /// back to 0 when metadata is unavailable.
    pub fn describe(path: &Path) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file_size = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);

        Self::new(filename, file_size, FileFormat::from_path(path))
    }
}

/// Record-at-a-time reader over a CSV file with a header row.
pub struct CsvRecords {
    path: PathBuf,
    source: SourceInfo,
    headers: Vec<String>,
    reader: Reader<File>,
    record: ByteRecord,
}

impl CsvRecords {
    /// Open a CSV file and read its header row.
    ///
    /// Fails with [`ProfilingError::FileNotFound`] when the path does not
    /// exist and [`ProfilingError::MissingHeader`] when there is no header.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProfilingError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
        let metadata = file
            .metadata()
            .context(format!("Failed to stat {}", path.display()))?;
        let mut source = SourceInfo::describe(path);
        source.file_size = metadata.len();
        source.format = FileFormat::Csv;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let headers: Vec<String> = reader
            .byte_headers()
            .context(format!("Failed to read header row of {}", path.display()))?
            .iter()
            .map(decode)
            .collect();

        if headers.is_empty() {
            let reason = if metadata.len() == 0 {
                "file is empty"
            } else {
                "no header row before end of file"
            };
            return Err(ProfilingError::MissingHeader {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            });
        }

        debug!("Opened {} with {} header fields", source.filename, headers.len());

        Ok(Self {
            path: path.to_path_buf(),
            source,
            headers,
            reader,
            record: ByteRecord::new(),
        })
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Replace `fields` with the next record. Returns `false` at end of file.
    pub fn read_record(&mut self, fields: &mut Vec<String>) -> Result<bool> {
        let more = self
            .reader
            .read_byte_record(&mut self.record)
            .context(format!("Failed to read {}", self.path.display()))?;
        if !more {
            return Ok(false);
        }

        fields.clear();
        fields.extend(self.record.iter().map(decode));
        Ok(true)
    }

    pub fn into_source(self) -> SourceInfo {
        self.source
    }
}

fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}
