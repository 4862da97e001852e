//! Domain layer - core types shared by every component.
//!
//! This layer contains pure domain models, configuration and error types
//! without any I/O.

pub mod config;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use models::{
    preview, ColumnSelector, ImportReport, InsertOutcome, Joke, JokeTable, StoreStats,
    TransferReport,
};
