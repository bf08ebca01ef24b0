//! Shared state handed to every handler.

use crate::services::database::Database;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppState {
    /// MySQL pool, built lazily at startup.
    pub db: Database,

    /// Directory whose files are served at `/`.
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(db: Database, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            public_dir: public_dir.into(),
        }
    }
}
