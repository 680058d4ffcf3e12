//! Headline counts for a snapshot of the directory.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::user::UserRecord;

/// How far back a record's `created_at` may lie and still count as new.
pub const NEW_WINDOW: TimeDelta = TimeDelta::days(7);

/// How far back a record's `updated_at` may lie and still count as fresh.
pub const UPDATED_WINDOW: TimeDelta = TimeDelta::hours(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
  pub total:         usize,
  /// Records created strictly within the last seven days.
  pub new_this_week: usize,
  /// Records updated strictly within the last 24 hours.
  pub updated_today: usize,
}

impl Overview {
  /// Count `records` as seen at `now`. Window edges are exclusive.
  pub fn of(records: &[UserRecord], now: DateTime<Utc>) -> Self {
    let new_since = now - NEW_WINDOW;
    let updated_since = now - UPDATED_WINDOW;
    Self {
      total:         records.len(),
      new_this_week: records.iter().filter(|r| r.created_at > new_since).count(),
      updated_today: records
        .iter()
        .filter(|r| r.updated_at > updated_since)
        .count(),
    }
  }
}
