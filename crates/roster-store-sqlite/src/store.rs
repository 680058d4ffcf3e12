//! [`SqliteStore`] — the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use chrono::Utc;
use roster_core::storage::KeyValueStore;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| Error::CreateDir { path: parent.to_path_buf(), source })?;
    }

    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteStore {
  type Error = Error;

  async fn read(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();

    let value: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(value)
  }

  async fn write(&self, key: &str, value: String) -> Result<()> {
    let key    = key.to_owned();
    let at_str = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
          rusqlite::params![key, value, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let key = key.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
