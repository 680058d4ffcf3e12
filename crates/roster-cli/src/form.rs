//! Form rules applied before the core is invoked.
//!
//! The session store and user directory do not re-validate; these checks are
//! the front end's responsibility.

use std::sync::LazyLock;

use regex::Regex;
use roster_core::{
  identity::{SignInCredentials, SignUpCredentials},
  user::{NewUser, UserPatch},
};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
  #[error("Please enter a valid email address")]
  InvalidEmail,
  #[error("Password must be at least 6 characters")]
  PasswordTooShort,
  #[error("Name must be at least 2 characters")]
  NameTooShort,
  #[error("Passwords don't match")]
  PasswordMismatch,
  #[error("Nothing to update; pass --name and/or --email")]
  EmptyPatch,
}

pub fn sign_in(creds: &SignInCredentials) -> Result<(), FormError> {
  email(&creds.email)?;
  password(&creds.password)
}

pub fn sign_up(creds: &SignUpCredentials) -> Result<(), FormError> {
  name(&creds.name)?;
  email(&creds.email)?;
  password(&creds.password)?;
  if creds.password != creds.confirm_password {
    return Err(FormError::PasswordMismatch);
  }
  Ok(())
}

pub fn new_user(input: &NewUser) -> Result<(), FormError> {
  name(&input.name)?;
  email(&input.email)
}

pub fn user_patch(patch: &UserPatch) -> Result<(), FormError> {
  if patch.is_empty() {
    return Err(FormError::EmptyPatch);
  }
  if let Some(n) = &patch.name {
    name(n)?;
  }
  if let Some(e) = &patch.email {
    email(e)?;
  }
  Ok(())
}

fn email(value: &str) -> Result<(), FormError> {
  if EMAIL.is_match(value) { Ok(()) } else { Err(FormError::InvalidEmail) }
}

fn password(value: &str) -> Result<(), FormError> {
  if value.chars().count() >= MIN_PASSWORD_LEN {
    Ok(())
  } else {
    Err(FormError::PasswordTooShort)
  }
}

fn name(value: &str) -> Result<(), FormError> {
  if value.chars().count() >= MIN_NAME_LEN {
    Ok(())
  } else {
    Err(FormError::NameTooShort)
  }
}
