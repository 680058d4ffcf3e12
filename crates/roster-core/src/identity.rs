//! Identity — the authenticated principal held by the session store.
//!
//! An identity is synthesised locally on sign-in or sign-up; there is no
//! account database behind it. It is distinct from a directory
//! [`UserRecord`](crate::user::UserRecord) even though both describe a person.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::fresh_id;

/// Display name used when an email has no local part (e.g. `"@example.com"`).
pub const FALLBACK_NAME: &str = "User";

/// The currently authenticated principal.
///
/// `updated_at` is set once at creation and never revised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub id:         String,
  pub email:      String,
  pub name:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Identity {
  /// Build a fresh identity with a new id and both timestamps set to `now`.
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id: fresh_id(),
      email: email.into(),
      name: name.into(),
      created_at: now,
      updated_at: now,
    }
  }

  /// Build the identity for a sign-in: the name defaults to the email's
  /// local part.
  pub fn from_email(email: &str, now: DateTime<Utc>) -> Self {
    Self::new(local_part(email), email, now)
  }
}

/// The portion of `email` before the first `@`, or [`FALLBACK_NAME`] when
/// that portion is empty.
pub fn local_part(email: &str) -> &str {
  match email.split('@').next() {
    Some(prefix) if !prefix.is_empty() => prefix,
    _ => FALLBACK_NAME,
  }
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Input to `SessionStore::sign_in`.
#[derive(Clone)]
pub struct SignInCredentials {
  pub email:    String,
  pub password: String,
}

impl SignInCredentials {
  pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
    Self { email: email.into(), password: password.into() }
  }
}

/// Input to `SessionStore::sign_up`.
///
/// `password == confirm_password` is checked by the caller's form layer
/// before the session store is invoked.
#[derive(Clone)]
pub struct SignUpCredentials {
  pub name:             String,
  pub email:            String,
  pub password:         String,
  pub confirm_password: String,
}

// Passwords never reach log output.
impl fmt::Debug for SignInCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SignInCredentials")
      .field("email", &self.email)
      .field("password", &"<redacted>")
      .finish()
  }
}

impl fmt::Debug for SignUpCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SignUpCredentials")
      .field("name", &self.name)
      .field("email", &self.email)
      .field("password", &"<redacted>")
      .field("confirm_password", &"<redacted>")
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn local_part_takes_text_before_at() {
    assert_eq!(local_part("ann@x.com"), "ann");
    assert_eq!(local_part("first.last+tag@example.org"), "first.last+tag");
  }

  #[test]
  fn local_part_without_at_is_whole_string() {
    assert_eq!(local_part("ann"), "ann");
  }

  #[test]
  fn empty_local_part_falls_back() {
    assert_eq!(local_part("@example.com"), FALLBACK_NAME);
    assert_eq!(local_part(""), FALLBACK_NAME);
  }

  #[test]
  fn from_email_sets_both_timestamps() {
    let now = Utc::now();
    let identity = Identity::from_email("ann@x.com", now);
    assert_eq!(identity.name, "ann");
    assert_eq!(identity.email, "ann@x.com");
    assert_eq!(identity.created_at, now);
    assert_eq!(identity.updated_at, now);
  }

  #[test]
  fn serialises_with_camel_case_keys() {
    let identity = Identity::from_email("ann@x.com", Utc::now());
    let json = serde_json::to_value(&identity).unwrap();
    assert!(json.get("createdAt").is_some());
    assert!(json.get("updatedAt").is_some());
    assert!(json.get("created_at").is_none());
  }

  #[test]
  fn debug_redacts_passwords() {
    let creds = SignInCredentials::new("ann@x.com", "hunter22");
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("ann@x.com"));
    assert!(!rendered.contains("hunter22"));
  }
}
