//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("user collection repeats id {0:?}")]
  DuplicateId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
