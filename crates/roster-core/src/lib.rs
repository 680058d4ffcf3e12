//! Core types and trait definitions for the Roster user-management core.
//!
//! This crate is deliberately free of runtime and database dependencies. The
//! session store and user directory (`roster-service`) and every storage
//! backend depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod codec;
pub mod error;
pub mod id;
pub mod identity;
pub mod overview;
pub mod storage;
pub mod user;

pub use error::{Error, Result};
