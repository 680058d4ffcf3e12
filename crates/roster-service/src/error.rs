//! Error types for `roster-service`.

use thiserror::Error;

/// Outcome of a failed sign-in or sign-up.
///
/// Internal faults are deliberately collapsed into [`InvalidCredentials`] and
/// [`SignUpFailed`]; callers never learn whether the email, the password, or
/// the backend was at fault.
///
/// [`InvalidCredentials`]: AuthError::InvalidCredentials
/// [`SignUpFailed`]: AuthError::SignUpFailed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
  #[error("email and password are required")]
  MissingCredentials,

  #[error("a session is already signed in")]
  AlreadySignedIn,

  #[error("the session is busy; try again")]
  Busy,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("account creation failed")]
  SignUpFailed,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("encoding error: {0}")]
  Encoding(#[from] roster_core::Error),
}

impl DirectoryError {
  pub(crate) fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }
}

pub type Result<T, E = DirectoryError> = std::result::Result<T, E>;
