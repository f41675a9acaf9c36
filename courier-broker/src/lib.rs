//! Broker facade for Courier.
//!
//! This crate assembles the stores from `courier-topic`,
//! `courier-progress`, `courier-queue`, and `courier-auth` into one
//! [`Broker`] context object: the single entry point a transport layer
//! (or an in-process caller) talks to.
//!
//! # Overview
//!
//! - Every operation takes a session [`courier_core::Token`] from
//!   [`Broker::login`] and fails with `Unauthorized` if it is unknown.
//! - Store errors surface as [`BrokerError`]; [`BrokerError::kind`]
//!   collapses them into the coarse [`ErrorKind`] taxonomy a wire
//!   protocol would speak.
//! - Time comes from a [`Clock`]: the system clock in production, a
//!   manual one in tests so lease expiry needs no sleeping.
//! - An optional background sweeper ([`Broker::spawn_sweeper`])
//!   reclaims expired queue leases on an interval.
//!
//! # Example
//!
//! ```ignore
//! use courier_broker::{Broker, BrokerConfig};
//!
//! let broker = Broker::new(BrokerConfig::new())?;
//! let token = broker.login("alice", "secret");
//!
//! broker.create_topic(&token, "orders", 4)?;
//! let (partition, offset) = broker.publish(&token, "orders", None, Some("customer-9"), payload)?;
//! let batch = broker.pull(&token, "orders", partition, "billing", 100)?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Allow these for cleaner code in this crate.
#![allow(clippy::module_name_repetitions)]

mod broker;
mod clock;
mod config;
mod error;
mod sweeper;

// Re-export public API.
pub use broker::Broker;
pub use clock::Clock;
pub use config::{BrokerConfig, DEFAULT_LEASE_TTL_US, DEFAULT_SWEEP_INTERVAL_US};
pub use error::{BrokerError, BrokerResult, ErrorKind};
pub use sweeper::SweeperHandle;

// Re-export the types that appear in the facade's signatures so
// embedders need only this crate.
pub use courier_core::{
    Limits, Message, MessageId, Offset, PartitionIndex, Timestamp, Token, UserId,
};
pub use courier_queue::{LeaseState, QueueMessage, QueueSummary};
pub use courier_topic::TopicSummary;
