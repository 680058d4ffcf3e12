//! [`UserDirectory`] — the ordered collection of [`UserRecord`]s.
//!
//! The whole collection is one JSON array under
//! [`USERS_KEY`](roster_core::storage::USERS_KEY). Every operation loads it,
//! and every mutation rewrites it in full. Records stay in insertion order.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use roster_core::{
  codec::{decode_records, encode_records},
  storage::{KeyValueStore, USERS_KEY},
  user::{NewUser, UserPatch, UserRecord, seed_records},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
  error::{DirectoryError, Result},
  latency::round_trip,
};

/// The user directory. Construct one per process around the shared storage.
pub struct UserDirectory<S> {
  storage: Arc<S>,
  latency: Duration,
  /// Serialises load-modify-persist so concurrent mutations never drop each
  /// other's writes to the collection.
  commit:  Mutex<()>,
}

impl<S: KeyValueStore> UserDirectory<S> {
  pub fn new(storage: Arc<S>, latency: Duration) -> Self {
    Self { storage, latency, commit: Mutex::new(()) }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All records in insertion order.
  ///
  /// The first read with no stored collection (or a malformed one) writes
  /// and returns the three seed records.
  pub async fn list(&self) -> Result<Vec<UserRecord>> {
    let _commit = self.commit.lock().await;
    self.load().await
  }

  /// The record with `id`, if any.
  pub async fn get(&self, id: &str) -> Result<Option<UserRecord>> {
    let records = self.list().await?;
    Ok(records.into_iter().find(|r| r.id == id))
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Append a new record with a fresh id.
  pub async fn create(&self, input: NewUser) -> Result<UserRecord> {
    round_trip(self.latency).await;

    let _commit = self.commit.lock().await;
    let mut records = self.load().await?;
    let record = UserRecord::create(input, Utc::now());
    records.push(record.clone());
    self.persist(&records).await?;

    info!(id = %record.id, email = %record.email, "created user");
    Ok(record)
  }

  /// Replace the fields present in `patch` on the record with `id`.
  ///
  /// `id` and `created_at` never change; `updated_at` strictly increases.
  pub async fn update(&self, id: &str, patch: UserPatch) -> Result<UserRecord> {
    round_trip(self.latency).await;

    let _commit = self.commit.lock().await;
    let mut records = self.load().await?;
    let record = records
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or_else(|| DirectoryError::UserNotFound(id.to_owned()))?;

    record.apply(patch, Utc::now());
    let updated = record.clone();
    self.persist(&records).await?;

    info!(id = %updated.id, "updated user");
    Ok(updated)
  }

  /// Remove the record with `id`.
  pub async fn delete(&self, id: &str) -> Result<()> {
    round_trip(self.latency).await;

    let _commit = self.commit.lock().await;
    let mut records = self.load().await?;
    let before = records.len();
    records.retain(|r| r.id != id);

    if records.len() == before {
      return Err(DirectoryError::UserNotFound(id.to_owned()));
    }

    self.persist(&records).await?;
    info!(id, "deleted user");
    Ok(())
  }

  // ── Storage ───────────────────────────────────────────────────────────────

  /// Callers hold `commit`.
  async fn load(&self) -> Result<Vec<UserRecord>> {
    let raw = self
      .storage
      .read(USERS_KEY)
      .await
      .map_err(DirectoryError::storage)?;

    if let Some(raw) = raw {
      match decode_records(&raw) {
        Ok(records) => {
          debug!(count = records.len(), "loaded user collection");
          return Ok(records);
        }
        Err(e) => warn!(error = %e, "discarding malformed user collection"),
      }
    }

    let seeds = seed_records();
    self.persist(&seeds).await?;
    info!(count = seeds.len(), "seeded user directory");
    Ok(seeds)
  }

  async fn persist(&self, records: &[UserRecord]) -> Result<()> {
    let raw = encode_records(records)?;
    self
      .storage
      .write(USERS_KEY, raw)
      .await
      .map_err(DirectoryError::storage)
  }
}
