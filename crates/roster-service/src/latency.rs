//! Simulated backend latency.
//!
//! Every mutating operation awaits a fixed delay before committing, standing
//! in for a network round trip. The delay always elapses; there is no
//! timeout, retry, or cancellation.

use std::time::Duration;

/// Per-component round-trip delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
  /// Delay before a sign-in or sign-up resolves.
  pub auth:      Duration,
  /// Delay before a directory create, update or delete commits.
  pub directory: Duration,
}

impl Latency {
  /// No simulated delay at all.
  pub const NONE: Self = Self { auth: Duration::ZERO, directory: Duration::ZERO };

  pub fn from_millis(auth: u64, directory: u64) -> Self {
    Self {
      auth:      Duration::from_millis(auth),
      directory: Duration::from_millis(directory),
    }
  }
}

impl Default for Latency {
  fn default() -> Self { Self::from_millis(1000, 500) }
}

/// Suspend the caller for `delay`.
pub(crate) async fn round_trip(delay: Duration) {
  if !delay.is_zero() {
    tokio::time::sleep(delay).await;
  }
}
