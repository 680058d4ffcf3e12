//! Encoding and decoding between domain types and the JSON blobs held by a
//! [`KeyValueStore`](crate::storage::KeyValueStore).
//!
//! Identities are stored as a single JSON object, user collections as a JSON
//! array in insertion order. Timestamps are RFC 3339 strings.

use std::collections::HashSet;

use crate::{Result, identity::Identity, user::UserRecord};

// ─── Identity ────────────────────────────────────────────────────────────────

pub fn encode_identity(identity: &Identity) -> Result<String> {
  Ok(serde_json::to_string(identity)?)
}

pub fn decode_identity(s: &str) -> Result<Identity> { Ok(serde_json::from_str(s)?) }

// ─── User collection ─────────────────────────────────────────────────────────

pub fn encode_records(records: &[UserRecord]) -> Result<String> {
  Ok(serde_json::to_string(records)?)
}

/// Decode a stored collection. A collection that repeats an id breaks the
/// directory's uniqueness invariant and is rejected like any other malformed
/// blob.
pub fn decode_records(s: &str) -> Result<Vec<UserRecord>> {
  let records: Vec<UserRecord> = serde_json::from_str(s)?;

  let mut seen = HashSet::with_capacity(records.len());
  if let Some(dup) = records.iter().find(|r| !seen.insert(r.id.as_str())) {
    return Err(crate::Error::DuplicateId(dup.id.clone()));
  }

  Ok(records)
}
