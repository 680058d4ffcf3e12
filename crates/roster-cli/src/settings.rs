//! Runtime settings.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file
//! (`roster.toml` in the working directory, or `--config`), then
//! `ROSTER_`-prefixed environment variables. `--store` on the command line
//! overrides the store path last.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use roster_service::Latency;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "~/.local/share/roster/roster.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite file holding the session and the user directory.
  pub store_path:           PathBuf,
  /// Simulated sign-in/sign-up round trip.
  pub auth_latency_ms:      u64,
  /// Simulated directory create/update/delete round trip.
  pub directory_latency_ms: u64,
}

impl Default for Settings {
  fn default() -> Self {
    let latency = Latency::default();
    Self {
      store_path:           PathBuf::from(DEFAULT_STORE_PATH),
      auth_latency_ms:      latency.auth.as_millis() as u64,
      directory_latency_ms: latency.directory.as_millis() as u64,
    }
  }
}

impl Settings {
  /// Load settings from `file` (required when given) or `roster.toml`
  /// (optional), then the environment.
  pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
    let source = match file {
      Some(path) => config::File::from(path).required(true),
      None => config::File::with_name("roster").required(false),
    };

    let mut settings: Settings = config::Config::builder()
      .add_source(source)
      .add_source(config::Environment::with_prefix("ROSTER"))
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  pub fn latency(&self) -> Latency {
    Latency::from_millis(self.auth_latency_ms, self.directory_latency_ms)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
