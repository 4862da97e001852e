//! Infrastructure layer - external adapters (database, filesystem, CSV).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod cursor_store;
pub mod joke_store;
pub mod tabular;

pub use config::{ensure_config_exists, load_config};
pub use cursor_store::{CursorStore, DEFAULT_CURSOR};
pub use joke_store::JokeStore;
pub use tabular::{write_indexed, ColumnReader};
