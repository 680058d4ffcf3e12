//! Session store and user directory for Roster.
//!
//! Both components are constructed explicitly around a shared
//! [`KeyValueStore`](roster_core::storage::KeyValueStore) and own disjoint
//! keys within it. Neither depends on the other. Backend round trips are
//! simulated with a configurable [`Latency`].

pub mod directory;
pub mod error;
pub mod latency;
pub mod session;

pub use directory::UserDirectory;
pub use error::{AuthError, DirectoryError};
pub use latency::Latency;
pub use session::{SessionState, SessionStore};

#[cfg(test)]
mod tests;
