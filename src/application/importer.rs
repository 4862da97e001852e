//! CSV import into a joke table.
//!
//! Each row is inserted with an ignore-on-duplicate policy; rows that fail
//! for any other reason are logged and counted, and the batch carries on.
//! The whole file is committed as one transaction.

use std::path::Path;

use crate::domain::{preview, ColumnSelector, ImportReport, InsertOutcome, JokeTable, Result};
use crate::infrastructure::{ColumnReader, JokeStore};

/// Characters of a failing joke shown in log lines.
const LOG_PREVIEW_CHARS: usize = 50;

/// Options for one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Column holding the joke text.
    pub column: ColumnSelector,
    /// Destination table.
    pub table: JokeTable,
}

/// Imports every row of `path` into the configured table.
///
/// # Errors
/// Returns error if the file cannot be opened, the column is missing, or the
/// final commit fails. Row-level failures are counted, not returned.
pub fn import_file(
    store: &mut JokeStore,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportReport> {
    tracing::info!(
        path = %path.display(),
        table = %options.table,
        column = %options.column,
        "Importing jokes"
    );

    let mut rows = ColumnReader::open(path, &options.column)?;
    let batch = store.begin_batch(options.table)?;
    let mut report = ImportReport::default();

    while let Some(row) = rows.next() {
        let text = match row {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(line = rows.line(), error = %e, "Skipping unreadable row");
                report.failed += 1;
                continue;
            }
        };

        match batch.insert(&text) {
            Ok(InsertOutcome::Inserted) => report.inserted += 1,
            Ok(InsertOutcome::Duplicate) => report.skipped += 1,
            Err(e) => {
                tracing::warn!(
                    line = rows.line(),
                    joke = %preview(&text, LOG_PREVIEW_CHARS),
                    error = %e,
                    "Failed to insert joke"
                );
                report.failed += 1;
            }
        }
    }

    batch.commit()?;

    tracing::info!(
        path = %path.display(),
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        "Import committed"
    );

    Ok(report)
}
