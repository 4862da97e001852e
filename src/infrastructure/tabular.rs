//! CSV adapter for the batch utilities.
//!
//! Reads one text column out of a headed CSV file and writes the export
//! format: an unnamed positional index column followed by `joke`.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord, Writer};

use crate::domain::{AppError, ColumnSelector, Result};

/// Header of the text column written by [`write_indexed`].
pub const TEXT_HEADER: &str = "joke";

/// Streams the values of one column, one item per CSV record.
pub struct ColumnReader {
    path: PathBuf,
    reader: Reader<File>,
    index: usize,
    record: StringRecord,
    line: u64,
}

impl ColumnReader {
    /// Opens `path` and resolves `selector` against its header row.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened, has no header, or lacks
    /// the selected column.
    pub fn open(path: &Path, selector: &ColumnSelector) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| AppError::csv(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| AppError::csv(path, e))?
            .clone();

        let index = match selector {
            ColumnSelector::Named(name) => headers.iter().position(|h| h == name),
            ColumnSelector::Position(index) => Some(*index).filter(|i| *i < headers.len()),
        }
        .ok_or_else(|| AppError::InvalidData {
            message: format!("{selector} not found in {}", path.display()),
        })?;

        tracing::debug!(path = %path.display(), column = index, "Resolved text column");

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            index,
            record: StringRecord::new(),
            line: 1,
        })
    }

    /// Line number of the record most recently returned.
    #[must_use]
    pub const fn line(&self) -> u64 {
        self.line
    }
}

impl Iterator for ColumnReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                self.line = self
                    .record
                    .position()
                    .map_or(self.line + 1, csv::Position::line);
                Some(
                    self.record
                        .get(self.index)
                        .map(str::to_string)
                        .ok_or_else(|| AppError::InvalidData {
                            message: format!("line {} has no column #{}", self.line, self.index),
                        }),
                )
            }
            Err(e) => {
                self.line += 1;
                Some(Err(AppError::csv(&self.path, e)))
            }
        }
    }
}

/// Writes `texts` as `,joke` CSV with a zero-based index column.
///
/// # Errors
/// Returns error if the file cannot be created or written.
pub fn write_indexed(path: &Path, texts: &[String]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create {}", parent.display()), e))?;
    }

    let mut writer = Writer::from_path(path).map_err(|e| AppError::csv(path, e))?;

    writer
        .write_record(["", TEXT_HEADER])
        .map_err(|e| AppError::csv(path, e))?;

    for (index, text) in texts.iter().enumerate() {
        writer
            .write_record([index.to_string().as_str(), text.as_str()])
            .map_err(|e| AppError::csv(path, e))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush {}", path.display()), e))?;

    Ok(texts.len())
}
