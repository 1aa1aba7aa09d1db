//! Async client for the carbonboard REST API.
//!
//! The [`Client`] is a thin wrapper over `reqwest`: one method per endpoint,
//! response envelopes unwrapped, HTTP failures mapped to [`ClientError`]. The
//! bearer token lives in an injectable [`Session`], optionally persisted
//! through a [`TokenStore`].
//!
//! Requests are sent once; there are no retries.

pub use activities::activity_record;
pub use client::Client;
pub use error::{ClientError, Result};
pub use session::Session;
pub use token_store::{DEFAULT_TOKEN_PATH, TokenStore};

pub mod transactions;

mod activities;
mod auth;
mod challenges;
mod client;
mod error;
mod session;
mod token_store;
mod users;
