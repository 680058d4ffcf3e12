//! Error type for `roster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("cannot create store directory {path}: {source}")]
  CreateDir {
    path:   std::path::PathBuf,
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
