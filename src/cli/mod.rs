//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the server and the
//! batch utilities.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{AppConfig, ColumnSelector, JokeTable, Result};
use crate::infrastructure::load_config;

/// Joke Rotator - serve jokes in a durable round-robin and manage the collection.
#[derive(Parser, Debug)]
#[command(name = "joke-rotator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file.
    #[arg(short, long, global = true, default_value = AppConfig::DEFAULT_FILE)]
    pub config: PathBuf,

    /// `SQLite` database path (overrides the config file).
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Cursor record path (overrides the config file).
    #[arg(long, global = true)]
    pub cursor: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve GET /joke over HTTP.
    Serve {
        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the tables, the cursor record and a default config file.
    Init,

    /// Import jokes from CSV files, skipping duplicates.
    Import {
        /// CSV files to import, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Header name of the joke column.
        #[arg(long, conflicts_with = "column_index")]
        column: Option<String>,

        /// Zero-based position of the joke column (counts any index column).
        #[arg(long)]
        column_index: Option<usize>,

        /// Load into the uncleaned_jokes staging table instead of jokes.
        #[arg(long)]
        staging: bool,
    },

    /// Move staged jokes into the jokes table, dropping duplicates.
    Transfer,

    /// Export all jokes to a CSV file with an index column.
    Export {
        /// Output file path.
        #[arg(short, long, default_value = "cleaned_jokes.csv")]
        output: PathBuf,
    },

    /// Show table sizes and the next joke id.
    Stats,

    /// Show the next joke id, or set it.
    Cursor {
        /// New value for the next joke id.
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        set: Option<i64>,
    },
}

impl Cli {
    /// Loads the config file and applies path overrides from the command line.
    ///
    /// # Errors
    /// Returns error if the config file exists but cannot be parsed.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = load_config(&self.config)?;

        if let Some(path) = &self.database {
            config.storage.database_path.clone_from(path);
        }
        if let Some(path) = &self.cursor {
            config.storage.cursor_path.clone_from(path);
        }

        Ok(config)
    }
}

/// Resolves the import column flags into a selector.
#[must_use]
pub fn column_selector(column: Option<String>, column_index: Option<usize>) -> ColumnSelector {
    match (column, column_index) {
        (_, Some(index)) => ColumnSelector::Position(index),
        (Some(name), None) => ColumnSelector::Named(name),
        (None, None) => ColumnSelector::default(),
    }
}

/// Table targeted by `import`.
#[must_use]
pub const fn import_table(staging: bool) -> JokeTable {
    if staging {
        JokeTable::Staging
    } else {
        JokeTable::Jokes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_flags() {
        let cli = Cli::try_parse_from([
            "joke-rotator",
            "import",
            "a.csv",
            "b.csv",
            "--column-index",
            "1",
            "--staging",
        ])
        .unwrap();

        match cli.command {
            Commands::Import {
                files,
                column,
                column_index,
                staging,
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(
                    column_selector(column, column_index),
                    ColumnSelector::Position(1)
                );
                assert_eq!(import_table(staging), JokeTable::Staging);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_column_flags_conflict() {
        assert!(Cli::try_parse_from([
            "joke-rotator",
            "import",
            "a.csv",
            "--column",
            "joke",
            "--column-index",
            "0",
        ])
        .is_err());
    }

    #[test]
    fn test_cursor_set_rejects_zero() {
        assert!(Cli::try_parse_from(["joke-rotator", "cursor", "--set", "0"]).is_err());
        assert!(Cli::try_parse_from(["joke-rotator", "cursor", "--set", "3"]).is_ok());
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("none.toml");
        let cli = Cli::try_parse_from([
            "joke-rotator",
            "--config",
            config.to_str().unwrap(),
            "--database",
            "/tmp/other.db",
            "stats",
        ])
        .unwrap();

        let app = cli.app_config().unwrap();
        assert_eq!(app.storage.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(app.storage.cursor_path, PathBuf::from("./counter.json"));
    }
}
