//! Application layer - use cases and orchestration.
//!
//! Joke rotation for the server, and the import, transfer and export
//! batch utilities.

pub mod exporter;
pub mod formatter;
pub mod importer;
pub mod rotation;
pub mod transfer;

pub use exporter::export_jokes;
pub use formatter::{collect_stats, format_import_report, format_stats, format_transfer_report};
pub use importer::{import_file, ImportOptions};
pub use rotation::{next_joke, RotationError};
pub use transfer::transfer_staged;
