//! Tests for the session store and user directory against in-memory storage.

mod directory;

use std::{
  io,
  sync::atomic::{AtomicBool, Ordering},
};

use roster_core::storage::{KeyValueStore, MemoryStore};

/// A [`MemoryStore`] whose operations can be switched to fail.
#[derive(Default)]
pub(crate) struct FlakyStore {
  pub inner:        MemoryStore,
  pub fail_reads:   AtomicBool,
  pub fail_writes:  AtomicBool,
  pub fail_removes: AtomicBool,
}

impl FlakyStore {
  pub fn with_entries(entries: impl IntoIterator<Item = (&'static str, String)>) -> Self {
    Self { inner: MemoryStore::with_entries(entries), ..Self::default() }
  }

  fn check(flag: &AtomicBool, op: &str) -> io::Result<()> {
    if flag.load(Ordering::SeqCst) {
      Err(io::Error::other(format!("injected {op} failure")))
    } else {
      Ok(())
    }
  }
}

impl KeyValueStore for FlakyStore {
  type Error = io::Error;

  async fn read(&self, key: &str) -> io::Result<Option<String>> {
    Self::check(&self.fail_reads, "read")?;
    Ok(self.inner.get(key))
  }

  async fn write(&self, key: &str, value: String) -> io::Result<()> {
    Self::check(&self.fail_writes, "write")?;
    let Ok(()) = self.inner.write(key, value).await;
    Ok(())
  }

  async fn remove(&self, key: &str) -> io::Result<()> {
    Self::check(&self.fail_removes, "remove")?;
    let Ok(()) = self.inner.remove(key).await;
    Ok(())
  }
}
