//! Staging-to-final transfer.

use crate::domain::{Result, TransferReport};
use crate::infrastructure::JokeStore;

/// Moves every staged joke into `jokes`, relying on the UNIQUE constraint to
/// drop duplicates. Rolls back entirely on failure.
///
/// # Errors
/// Returns error if the transfer statement or commit fails.
pub fn transfer_staged(store: &mut JokeStore) -> Result<TransferReport> {
    tracing::info!("Transferring staged jokes");

    let report = store.transfer_staging().inspect_err(|e| {
        tracing::error!(error = %e, "Transfer rolled back");
    })?;

    tracing::info!(
        staged = report.staged,
        inserted = report.inserted,
        final_count = report.final_count,
        "Transfer committed"
    );

    Ok(report)
}
