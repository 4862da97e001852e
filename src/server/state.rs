use std::path::PathBuf;
use std::sync::Arc;

use crate::infrastructure::CursorStore;

#[derive(Clone)]
pub struct AppState {
    pub cursor: Arc<CursorStore>,
    pub database_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(cursor: CursorStore, database_path: PathBuf) -> Self {
        Self {
            cursor: Arc::new(cursor),
            database_path: Arc::new(database_path),
        }
    }
}
