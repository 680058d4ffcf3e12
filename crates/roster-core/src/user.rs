//! User records — the entries managed by the user directory.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::id::fresh_id;

// ─── Record ──────────────────────────────────────────────────────────────────

/// A directory entry. `id` is unique within the directory and `created_at`
/// never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
  pub id:         String,
  pub name:       String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl UserRecord {
  /// Build a new record with a fresh id and `created_at == updated_at == now`.
  pub fn create(input: NewUser, now: DateTime<Utc>) -> Self {
    Self {
      id:         fresh_id(),
      name:       input.name,
      email:      input.email,
      created_at: now,
      updated_at: now,
    }
  }

  /// Replace the fields present in `patch` and refresh `updated_at`.
  ///
  /// `updated_at` strictly increases even if the wall clock stalls or steps
  /// backwards between two updates.
  pub fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(email) = patch.email {
      self.email = email;
    }
    self.updated_at = now.max(self.updated_at + TimeDelta::microseconds(1));
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to `UserDirectory::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
  pub name:  String,
  pub email: String,
}

impl NewUser {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self { name: name.into(), email: email.into() }
  }
}

/// Input to `UserDirectory::update`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

impl UserPatch {
  pub fn name(name: impl Into<String>) -> Self {
    Self { name: Some(name.into()), ..Self::default() }
  }

  pub fn email(email: impl Into<String>) -> Self {
    Self { email: Some(email.into()), ..Self::default() }
  }

  pub fn is_empty(&self) -> bool { self.name.is_none() && self.email.is_none() }
}

// ─── Seed data ───────────────────────────────────────────────────────────────

/// The three sample records written the first time the directory is read
/// with no prior state. Order is fixed.
pub fn seed_records() -> Vec<UserRecord> {
  // 2024-01-01, 2024-01-02 and 2024-01-03 at midnight UTC.
  const SEEDS: [(&str, &str, &str, i64); 3] = [
    ("1", "John Doe", "john@example.com", 1_704_067_200),
    ("2", "Jane Smith", "jane@example.com", 1_704_153_600),
    ("3", "Bob Johnson", "bob@example.com", 1_704_240_000),
  ];

  SEEDS
    .iter()
    .map(|&(id, name, email, secs)| {
      let at = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(secs);
      UserRecord {
        id:         id.to_owned(),
        name:       name.to_owned(),
        email:      email.to_owned(),
        created_at: at,
        updated_at: at,
      }
    })
    .collect()
}
