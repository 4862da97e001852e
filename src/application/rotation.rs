//! Round-robin joke selection.
//!
//! Reads the durable cursor, heals it if it points outside the table,
//! serves the matching joke and advances the cursor, wrapping after the
//! last joke.

use thiserror::Error;

use crate::domain::{AppError, Joke, JokeTable};
use crate::infrastructure::{CursorStore, JokeStore, DEFAULT_CURSOR};

/// Why no joke could be served.
#[derive(Error, Debug)]
pub enum RotationError {
    /// The jokes table has no rows.
    #[error("No jokes found in the database. Please add jokes to the 'jokes' table.")]
    Empty,

    /// The id lookup and the first-joke fallback both came back empty.
    #[error("No jokes available in the database.")]
    Unavailable,

    /// Counting or fetching failed.
    #[error("Failed to fetch joke from database.")]
    Database(#[from] AppError),
}

/// Serves the joke under the cursor and advances the cursor by one.
///
/// The cursor lock is held for the whole call, so concurrent callers see
/// consecutive ids. On [`RotationError::Empty`] the cursor is not advanced.
///
/// # Errors
/// Returns [`RotationError`] when the table is empty or a query fails.
pub fn next_joke(cursor: &CursorStore, store: &JokeStore) -> Result<Joke, RotationError> {
    let guard = cursor.lock();

    let mut current = guard.read();
    let total = i64::try_from(store.count(JokeTable::Jokes)?).unwrap_or(i64::MAX);

    if total == 0 {
        return Err(RotationError::Empty);
    }

    if !(1..=total).contains(&current) {
        tracing::info!(current, total, "Cursor out of bounds, resetting");
        current = DEFAULT_CURSOR;
        guard.write(current);
    }

    let joke = if let Some(joke) = store.get(current)? {
        joke
    } else {
        tracing::warn!(id = current, "Joke id missing, falling back to first joke");
        let first = store.first()?.ok_or(RotationError::Unavailable)?;
        tracing::info!(id = first.id, "Serving first available joke");
        first
    };

    let next = if joke.id == total { 1 } else { joke.id + 1 };
    guard.write(next);

    tracing::debug!(served = joke.id, next, total, "Advanced cursor");

    Ok(joke)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        dir: TempDir,
        cursor: CursorStore,
        store: JokeStore,
    }

    impl Fixture {
        fn with_jokes(texts: &[&str]) -> Self {
            let dir = tempdir().unwrap();
            let mut store = JokeStore::open(&dir.path().join("jokes.db")).unwrap();
            let batch = store.begin_batch(JokeTable::Jokes).unwrap();
            for text in texts {
                batch.insert(text).unwrap();
            }
            batch.commit().unwrap();
            let cursor = CursorStore::new(dir.path().join("counter.json"));
            Self { dir, cursor, store }
        }

        fn serve(&self) -> Result<Joke, RotationError> {
            next_joke(&self.cursor, &self.store)
        }

        fn served_ids(&self, n: usize) -> Vec<i64> {
            (0..n).map(|_| self.serve().unwrap().id).collect()
        }
    }

    #[test]
    fn test_cycles_in_order_and_wraps() {
        let fx = Fixture::with_jokes(&["a", "b", "c"]);

        assert_eq!(fx.served_ids(7), vec![1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(fx.cursor.read(), 2);
    }

    #[test]
    fn test_last_joke_wraps_cursor_to_one() {
        let fx = Fixture::with_jokes(&["a", "b", "c"]);
        fx.cursor.write(3);

        let joke = fx.serve().unwrap();
        assert_eq!(joke.id, 3);
        assert_eq!(joke.text, "c");
        assert_eq!(fx.cursor.read(), 1);

        assert_eq!(fx.serve().unwrap().id, 1);
        assert_eq!(fx.cursor.read(), 2);
    }

    #[test]
    fn test_out_of_range_cursor_heals_to_first() {
        let fx = Fixture::with_jokes(&["a", "b", "c"]);

        fx.cursor.write(99);
        assert_eq!(fx.serve().unwrap().id, 1);
        assert_eq!(fx.cursor.read(), 2);

        std::fs::write(fx.cursor.path(), r#"{"current_joke_id": -3}"#).unwrap();
        assert_eq!(fx.serve().unwrap().id, 1);
        assert_eq!(fx.cursor.read(), 2);
    }

    #[test]
    fn test_empty_store_leaves_cursor_alone() {
        let fx = Fixture::with_jokes(&[]);
        fx.cursor.write(5);

        for _ in 0..3 {
            assert!(matches!(fx.serve(), Err(RotationError::Empty)));
        }
        assert_eq!(fx.cursor.read(), 5);
    }

    #[test]
    fn test_gap_falls_back_to_smallest_id() {
        let fx = Fixture::with_jokes(&["a", "b", "c", "d"]);
        fx.store.execute_raw("DELETE FROM jokes WHERE id IN (1, 2)");
        // total is now 2, ids are {3, 4}
        fx.cursor.write(2);

        let joke = fx.serve().unwrap();
        assert_eq!(joke.id, 3);
        assert_eq!(fx.cursor.read(), 4);

        // 4 > total, heals to 1, which is missing, so 3 again
        assert_eq!(fx.serve().unwrap().id, 3);
    }

    #[test]
    fn test_concurrent_requests_each_get_a_distinct_slot() {
        let fx = Fixture::with_jokes(&["a", "b", "c", "d"]);
        let cursor = Arc::new(CursorStore::new(fx.dir.path().join("counter.json")));
        let db = fx.dir.path().join("jokes.db");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cursor = Arc::clone(&cursor);
                let db = db.clone();
                std::thread::spawn(move || {
                    let store = JokeStore::open(&db).unwrap();
                    (0..10)
                        .map(|_| next_joke(&cursor, &store).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut counts = [0usize; 4];
        for handle in handles {
            for id in handle.join().unwrap() {
                counts[usize::try_from(id - 1).unwrap()] += 1;
            }
        }

        assert_eq!(counts, [10, 10, 10, 10]);
        assert_eq!(cursor.read(), 1);
    }
}
