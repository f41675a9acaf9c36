//! Topic storage for Courier.
//!
//! This crate provides named topics backed by in-memory append-only
//! partition logs, with key-based partition routing.
//!
//! # Overview
//!
//! - **Topics**: Named, created with a fixed partition count, owned by
//!   the identity that created them. Only the creator may delete one.
//! - **Partition logs**: Each partition is an append-only sequence of
//!   messages with dense offsets starting at 0. Reads never consume;
//!   any reader can re-read any retained offset.
//! - **Routing**: Publishing with an explicit partition targets it
//!   directly; a message key hashes to a stable partition; unkeyed
//!   messages land on partition 0.
//!
//! # Example
//!
//! ```ignore
//! use courier_topic::TopicStore;
//! use courier_core::{Limits, Message, Offset, PartitionIndex, UserId};
//!
//! let store = TopicStore::new(Limits::new());
//! store.create("orders", 4, UserId::new("alice"))?;
//!
//! let msg = Message::new(b"hello".to_vec(), UserId::new("alice")).with_key("customer-9");
//! let (partition, offset) = store.publish("orders", None, msg, now_us)?;
//!
//! let batch = store.read("orders", partition, Offset::earliest(), 100)?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Allow these for cleaner code in this crate.
#![allow(clippy::module_name_repetitions)]

mod error;
mod log;
mod router;
mod topic;

// Re-export public API.
pub use error::{TopicError, TopicResult};
pub use log::PartitionLog;
pub use router::{fnv1a_32, partition_for_key};
pub use topic::{Topic, TopicStore, TopicSummary};
