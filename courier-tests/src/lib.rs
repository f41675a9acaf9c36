//! Integration tests for the Courier broker.
//!
//! End-to-end tests that drive the full [`courier_broker::Broker`]
//! facade across crates. Tests are organized by the surface they
//! exercise:
//!
//! - `broker_tests`: multi-user workflows and error surfacing
//! - `topic_tests`: publish/pull/commit, routing, and concurrency
//! - `progress_tests`: consumer-group offset tracking
//! - `queue_tests`: FIFO delivery, leases, and redelivery
//!
//! **Support Modules**:
//! - `scenarios`: broker builders on deterministic clocks
//!
//! ## Naming Conventions
//!
//! - Integration tests: `test_<component>_<scenario>`
//! - Unit tests: Inline in each crate under `#[cfg(test)]`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod scenarios;

#[cfg(test)]
mod progress_tests;
