//! Record identifiers.
//!
//! Identities and user records carry opaque string ids. Fresh ids are UUIDv7:
//! the leading 48 bits are the creation time in milliseconds and the uuid
//! crate's shared v7 context keeps ids generated in one process unique and
//! increasing, even within the same millisecond.

use uuid::Uuid;

/// Generate a fresh, creation-time-derived id.
pub fn fresh_id() -> String { Uuid::now_v7().hyphenated().to_string() }
