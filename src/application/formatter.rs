//! Terminal output for the batch utilities.

use std::path::Path;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ImportReport, JokeTable, Result, StoreStats, TransferReport};
use crate::infrastructure::{CursorStore, JokeStore};

/// Gathers counts from the store and the cursor record.
///
/// # Errors
/// Returns error if the store cannot be queried.
pub fn collect_stats(store: &JokeStore, cursor: &CursorStore) -> Result<StoreStats> {
    Ok(StoreStats {
        jokes: store.count(JokeTable::Jokes)?,
        staged: store.count(JokeTable::Staging)?,
        id_range: store.id_range()?,
        cursor: cursor.read(),
    })
}

/// Formats store statistics as a table.
pub fn format_stats(stats: &StoreStats) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Table", "Rows", "Ids"]);

    let ids = stats
        .id_range
        .map_or_else(|| "-".to_string(), |(lo, hi)| format!("{lo}..={hi}"));

    table.add_row(vec![JokeTable::Jokes.as_str(), &stats.jokes.to_string(), &ids]);
    table.add_row(vec![JokeTable::Staging.as_str(), &stats.staged.to_string(), "-"]);

    format!(
        "{}\n{table}\n  Next joke id: {}",
        "📊 Statistics".bold(),
        stats.cursor.to_string().cyan()
    )
}

/// One-line summary of an import.
pub fn format_import_report(path: &Path, table: JokeTable, report: &ImportReport) -> String {
    let failed = if report.failed > 0 {
        report.failed.to_string().red()
    } else {
        report.failed.to_string().normal()
    };

    format!(
        "{} {} → {} ({} rows)  Inserted: {}, Skipped (duplicates): {}, Failed: {}",
        "✓".green().bold(),
        path.display(),
        table,
        report.rows(),
        report.inserted.to_string().green(),
        report.skipped.to_string().yellow(),
        failed
    )
}

/// Summary of a staging transfer.
pub fn format_transfer_report(report: &TransferReport) -> String {
    format!(
        "{} Transferred {} staged jokes, {} new. Final count of jokes: {}",
        "✓".green().bold(),
        report.staged,
        report.inserted.to_string().green(),
        report.final_count.to_string().cyan()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table_lists_both_tables() {
        colored::control::set_override(false);
        let out = format_stats(&StoreStats {
            jokes: 3,
            staged: 10,
            id_range: Some((1, 3)),
            cursor: 2,
        });

        assert!(out.contains("jokes"));
        assert!(out.contains("uncleaned_jokes"));
        assert!(out.contains("1..=3"));
        assert!(out.contains("Next joke id: 2"));
    }

    #[test]
    fn test_import_report_mentions_counts() {
        colored::control::set_override(false);
        let out = format_import_report(
            Path::new("dad_jokes.csv"),
            JokeTable::Jokes,
            &ImportReport {
                inserted: 4,
                skipped: 1,
                failed: 0,
            },
        );

        assert!(out.contains("Inserted: 4"));
        assert!(out.contains("Skipped (duplicates): 1"));
    }
}
