//! [`SessionStore`] — holds at most one authenticated [`Identity`].
//!
//! The store moves through
//! `Restoring → SignedOut → Authenticating → SignedIn` and back to
//! `SignedOut` on sign-out. State lives in a [`tokio::sync::watch`] channel:
//! readers take a snapshot with [`SessionStore::state`] or follow transitions
//! through [`SessionStore::subscribe`].
//!
//! Memory and storage agree once a sign-in or sign-up settles. An attempt
//! abandoned after its write was issued has that write undone by a spawned
//! `remove`, so a restart does not resurrect it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use roster_core::{
  codec::{decode_identity, encode_identity},
  identity::{Identity, SignInCredentials, SignUpCredentials},
  storage::{KeyValueStore, SESSION_KEY},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{error::AuthError, latency::round_trip};

type Fault = Box<dyn std::error::Error + Send + Sync>;

// ─── State ───────────────────────────────────────────────────────────────────

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
  /// The persisted identity has not been read yet.
  Restoring,
  SignedOut,
  /// A sign-in or sign-up is awaiting its backend round trip.
  Authenticating,
  SignedIn(Identity),
}

impl SessionState {
  /// True while restoring or authenticating; callers gate UI on this.
  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Restoring | Self::Authenticating)
  }

  pub fn identity(&self) -> Option<&Identity> {
    match self {
      Self::SignedIn(identity) => Some(identity),
      _ => None,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The session store. Construct one per process and pass it to whatever
/// needs the current identity.
pub struct SessionStore<S> {
  storage: Arc<S>,
  latency: std::time::Duration,
  state:   watch::Sender<SessionState>,
}

impl<S: KeyValueStore + 'static> SessionStore<S> {
  /// Create a store in the [`SessionState::Restoring`] state without touching
  /// storage. Call [`restore`](Self::restore) to finish initialisation.
  pub fn new(storage: Arc<S>, latency: std::time::Duration) -> Self {
    let (state, _) = watch::channel(SessionState::Restoring);
    Self { storage, latency, state }
  }

  /// Create a store and restore any persisted identity.
  pub async fn open(storage: Arc<S>, latency: std::time::Duration) -> Self {
    let store = Self::new(storage, latency);
    store.restore().await;
    store
  }

  /// Snapshot of the current state.
  pub fn state(&self) -> SessionState { self.state.borrow().clone() }

  /// The signed-in identity, if any.
  pub fn identity(&self) -> Option<Identity> {
    self.state.borrow().identity().cloned()
  }

  pub fn is_loading(&self) -> bool { self.state.borrow().is_loading() }

  /// Follow state transitions. The receiver starts at the current state.
  pub fn subscribe(&self) -> watch::Receiver<SessionState> { self.state.subscribe() }

  // ── Restore ───────────────────────────────────────────────────────────────

  /// Load the persisted identity, if present and well-formed.
  ///
  /// A malformed record is removed from storage and the session starts
  /// signed out. Only acts while [`SessionState::Restoring`]; afterwards it
  /// returns the current identity unchanged.
  pub async fn restore(&self) -> Option<Identity> {
    let restoring = matches!(*self.state.borrow(), SessionState::Restoring);
    if !restoring {
      return self.identity();
    }

    let restored = self.load_persisted().await;
    let next = match &restored {
      Some(identity) => SessionState::SignedIn(identity.clone()),
      None => SessionState::SignedOut,
    };
    self.state.send_replace(next);
    restored
  }

  async fn load_persisted(&self) -> Option<Identity> {
    let raw = match self.storage.read(SESSION_KEY).await {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        debug!("no persisted session");
        return None;
      }
      Err(e) => {
        warn!(error = %e, "failed to read persisted session");
        return None;
      }
    };

    match decode_identity(&raw) {
      Ok(identity) => {
        info!(email = %identity.email, "restored session");
        Some(identity)
      }
      Err(e) => {
        warn!(error = %e, "discarding malformed persisted session");
        if let Err(e) = self.storage.remove(SESSION_KEY).await {
          warn!(error = %e, "failed to remove malformed session");
        }
        None
      }
    }
  }

  // ── Sign-in / sign-up ─────────────────────────────────────────────────────

  /// Sign in with an email and password.
  ///
  /// Only non-emptiness is checked; the identity is synthesised from the
  /// email after the simulated round trip. Every internal fault is reported
  /// as [`AuthError::InvalidCredentials`].
  pub async fn sign_in(
    &self,
    credentials: SignInCredentials,
  ) -> Result<Identity, AuthError> {
    if credentials.email.is_empty() || credentials.password.is_empty() {
      return Err(AuthError::MissingCredentials);
    }

    let mut pending = self.begin()?;
    debug!(email = %credentials.email, "signing in");

    self
      .authenticate(&mut pending, |now| Identity::from_email(&credentials.email, now))
      .await
      .map_err(|e| {
        warn!(error = %e, "sign-in failed");
        AuthError::InvalidCredentials
      })
  }

  /// Create an account and sign in as it.
  ///
  /// Every internal fault is reported as [`AuthError::SignUpFailed`].
  pub async fn sign_up(
    &self,
    credentials: SignUpCredentials,
  ) -> Result<Identity, AuthError> {
    if credentials.name.is_empty()
      || credentials.email.is_empty()
      || credentials.password.is_empty()
    {
      return Err(AuthError::MissingCredentials);
    }

    let mut pending = self.begin()?;
    debug!(email = %credentials.email, "signing up");

    let SignUpCredentials { name, email, .. } = credentials;
    self
      .authenticate(&mut pending, move |now| Identity::new(name, email, now))
      .await
      .map_err(|e| {
        warn!(error = %e, "sign-up failed");
        AuthError::SignUpFailed
      })
  }

  /// Enter `Authenticating`. Allowed only from `SignedOut`.
  fn begin(&self) -> Result<Pending<'_, S>, AuthError> {
    let mut current = None;
    let entered = self.state.send_if_modified(|state| match state {
      SessionState::SignedOut => {
        *state = SessionState::Authenticating;
        true
      }
      other => {
        current = Some(other.clone());
        false
      }
    });

    if entered {
      return Ok(Pending {
        state:      &self.state,
        storage:    &self.storage,
        persisting: false,
      });
    }
    match current {
      Some(SessionState::SignedIn(_)) => Err(AuthError::AlreadySignedIn),
      _ => Err(AuthError::Busy),
    }
  }

  async fn authenticate(
    &self,
    pending: &mut Pending<'_, S>,
    build: impl FnOnce(DateTime<Utc>) -> Identity,
  ) -> Result<Identity, Fault> {
    round_trip(self.latency).await;

    let identity = build(Utc::now());
    let raw = encode_identity(&identity)?;
    pending.persisting = true;
    self.storage.write(SESSION_KEY, raw).await?;

    info!(email = %identity.email, id = %identity.id, "signed in");
    self.state.send_replace(SessionState::SignedIn(identity.clone()));
    Ok(identity)
  }

  // ── Sign-out ──────────────────────────────────────────────────────────────

  /// Clear the identity from memory and storage. Always succeeds; signing
  /// out while signed out is a no-op.
  pub async fn sign_out(&self) {
    let was_signed_in = self
      .state
      .send_if_modified(|state| match state {
        SessionState::SignedIn(_) => {
          *state = SessionState::SignedOut;
          true
        }
        _ => false,
      });

    if let Err(e) = self.storage.remove(SESSION_KEY).await {
      warn!(error = %e, "failed to remove persisted session");
    }

    if was_signed_in {
      info!("signed out");
    }
  }
}

// ─── Pending ─────────────────────────────────────────────────────────────────

/// Held for the duration of a sign-in or sign-up. If the operation ends
/// without reaching `SignedIn` (a fault, or the future being dropped), the
/// session falls back to `SignedOut`. If the session write had already been
/// issued, it is undone in the background.
struct Pending<'a, S: KeyValueStore + 'static> {
  state:      &'a watch::Sender<SessionState>,
  storage:    &'a Arc<S>,
  persisting: bool,
}

impl<S: KeyValueStore + 'static> Drop for Pending<'_, S> {
  fn drop(&mut self) {
    let reverted = self.state.send_if_modified(|state| {
      if matches!(state, SessionState::Authenticating) {
        *state = SessionState::SignedOut;
        true
      } else {
        false
      }
    });

    if reverted && self.persisting {
      discard_session(self.storage.clone());
    }
  }
}

/// Remove a session record left behind by an abandoned attempt.
fn discard_session<S: KeyValueStore + 'static>(storage: Arc<S>) {
  let Ok(runtime) = tokio::runtime::Handle::try_current() else {
    warn!("no runtime to discard an abandoned session write");
    return;
  };
  runtime.spawn(async move {
    match storage.remove(SESSION_KEY).await {
      Ok(()) => debug!("discarded abandoned session write"),
      Err(e) => warn!(error = %e, "failed to discard abandoned session write"),
    }
  });
}
