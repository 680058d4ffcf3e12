//! The `KeyValueStore` trait and the in-memory implementation.
//!
//! The trait is the single persistence seam: the session store and the user
//! directory read, write and remove serialised blobs under fixed keys, and
//! backends (`roster-store-sqlite`, [`MemoryStore`]) decide where those blobs
//! live. A real remote backend can replace either without changing the
//! component contracts.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Mutex, MutexGuard, PoisonError},
};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Storage key owned by the session store: one serialised `Identity`.
pub const SESSION_KEY: &str = "user";

/// Storage key owned by the user directory: a JSON array of `UserRecord`s.
pub const USERS_KEY: &str = "users";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable key-value surface.
///
/// Each key maps to at most one string blob. Writes replace the whole value.
///
/// All methods return `Send` futures so stores can be shared across tasks
/// in multi-threaded runtimes.
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the blob stored under `key`. Returns `None` if absent.
  fn read<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous blob.
  fn write<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove `key`. Removing an absent key is not an error.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A process-local store backed by a `HashMap`. Never fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Build a store pre-populated with `entries`.
  pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    let map = entries
      .into_iter()
      .map(|(k, v)| (k.into(), v.into()))
      .collect();
    Self { entries: Mutex::new(map) }
  }

  /// Synchronous read, for inspection outside an async context.
  pub fn get(&self, key: &str) -> Option<String> {
    self.lock().get(key).cloned()
  }

  pub fn contains_key(&self, key: &str) -> bool { self.lock().contains_key(key) }

  // A panic while holding the lock cannot leave the map half-written, so a
  // poisoned lock is still safe to use.
  fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  async fn read(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.get(key))
  }

  async fn write(&self, key: &str, value: String) -> Result<(), Infallible> {
    self.lock().insert(key.to_owned(), value);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), Infallible> {
    self.lock().remove(key);
    Ok(())
  }
}
