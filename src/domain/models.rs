//! Domain models for the joke collection.
//!
//! These models are shared by the server and every batch utility so the
//! table shape is defined in exactly one place.

use serde::{Deserialize, Serialize};

/// A stored joke, as served by `GET /joke`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    /// Autoincrement identifier assigned by the store.
    #[serde(rename = "joke_id")]
    pub id: i64,
    /// Joke text, unique across the table.
    #[serde(rename = "joke")]
    pub text: String,
}

/// Tables sharing the joke schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JokeTable {
    /// Final, deduplicated table served by the endpoint.
    #[default]
    Jokes,
    /// Pre-deduplication holding area filled by imports.
    Staging,
}

impl JokeTable {
    /// Both tables, in schema creation order.
    pub const ALL: [Self; 2] = [Self::Jokes, Self::Staging];

    /// SQL table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jokes => "jokes",
            Self::Staging => "uncleaned_jokes",
        }
    }
}

impl std::fmt::Display for JokeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single ignore-on-duplicate insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// The text already existed; nothing was written.
    Duplicate,
}

/// Which CSV column holds the joke text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Column matched by header name.
    Named(String),
    /// Zero-based column position, counting any index column.
    Position(usize),
}

impl Default for ColumnSelector {
    fn default() -> Self {
        Self::Named("joke".to_string())
    }
}

impl std::fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "column '{name}'"),
            Self::Position(index) => write!(f, "column #{index}"),
        }
    }
}

/// Counters for one imported file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows newly written to the target table.
    pub inserted: usize,
    /// Rows ignored because the text already existed.
    pub skipped: usize,
    /// Rows that could not be inserted for any other reason.
    pub failed: usize,
}

impl ImportReport {
    /// Total rows seen in the source.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.inserted + self.skipped + self.failed
    }
}

/// Outcome of moving staged jokes into the final table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Rows present in the staging table.
    pub staged: usize,
    /// Rows actually added to the final table.
    pub inserted: usize,
    /// Row count of the final table after commit.
    pub final_count: usize,
}

/// Snapshot shown by the `stats` command.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Rows in `jokes`.
    pub jokes: usize,
    /// Rows in `uncleaned_jokes`.
    pub staged: usize,
    /// Smallest and largest joke id, if any.
    pub id_range: Option<(i64, i64)>,
    /// Persisted cursor value.
    pub cursor: i64,
}

/// Shortens text for log lines, keeping at most `max_chars` characters.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joke_serializes_with_wire_names() {
        let joke = Joke {
            id: 7,
            text: "Why did the chicken cross the road?".into(),
        };
        let json = serde_json::to_value(&joke).unwrap();
        assert_eq!(json["joke_id"], 7);
        assert_eq!(json["joke"], "Why did the chicken cross the road?");
    }

    #[test]
    fn test_preview_counts_chars() {
        assert_eq!(preview("short", 50), "short");
        assert_eq!(preview("héllo world", 5), "héllo...");
    }

    #[test]
    fn test_table_names() {
        assert_eq!(JokeTable::Jokes.as_str(), "jokes");
        assert_eq!(JokeTable::Staging.to_string(), "uncleaned_jokes");
    }
}
