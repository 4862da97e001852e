//! CSV export of the final joke table.

use std::path::Path;

use crate::domain::{JokeTable, Result};
use crate::infrastructure::{write_indexed, JokeStore};

/// Writes every joke, in id order, to `path` as indexed CSV.
///
/// Returns the number of jokes written.
///
/// # Errors
/// Returns error if the table cannot be read or the file cannot be written.
pub fn export_jokes(store: &JokeStore, path: &Path) -> Result<usize> {
    let texts = store.texts(JokeTable::Jokes)?;
    let written = write_indexed(path, &texts)?;

    tracing::info!(path = %path.display(), rows = written, "Exported jokes");

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::importer::{import_file, ImportOptions};
    use tempfile::tempdir;

    #[test]
    fn test_export_then_reimport_adds_nothing() {
        let dir = tempdir().unwrap();
        let mut store = JokeStore::open(&dir.path().join("jokes.db")).unwrap();
        let source = dir.path().join("source.csv");
        std::fs::write(
            &source,
            "joke\n\"Two fish in a tank. One says: \"\"How do you drive this thing?\"\"\"\nplain\n",
        )
        .unwrap();
        import_file(&mut store, &source, &ImportOptions::default()).unwrap();

        let exported = dir.path().join("cleaned_jokes.csv");
        assert_eq!(export_jokes(&store, &exported).unwrap(), 2);

        let report = import_file(&mut store, &exported, &ImportOptions::default()).unwrap();

        assert_eq!(report.inserted, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(store.count(JokeTable::Jokes).unwrap(), 2);
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let dir = tempdir().unwrap();
        let store = JokeStore::open(&dir.path().join("jokes.db")).unwrap();
        let path = dir.path().join("empty.csv");

        assert_eq!(export_jokes(&store, &path).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ",joke\n");
    }
}
