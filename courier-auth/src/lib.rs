//! Session token auth for Courier.
//!
//! Every broker operation carries a token; this crate issues them and
//! resolves them back to user identities. The model is deliberately
//! minimal: there is no credential store, so login always succeeds
//! and binds a fresh random token to the given user name.
//!
//! Authorization itself is data-driven: topics and queues record their
//! creator, and the stores enforce creator-only deletion at the point
//! of deletion. This crate's job ends at answering "who is calling?".

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Allow these for cleaner code in this crate.
#![allow(clippy::module_name_repetitions)]

mod error;
mod registry;

// Re-export public API.
pub use error::{AuthError, AuthResult};
pub use registry::TokenRegistry;
