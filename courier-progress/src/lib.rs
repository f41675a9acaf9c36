//! Consumer-group offset tracking for Courier.
//!
//! Consumer groups read topic partitions at their own pace. This crate
//! stores each group's committed position (the next offset it will
//! read) keyed by `(topic, group, partition)`.
//!
//! # Overview
//!
//! - **Implicit groups**: No registration. A group exists the moment it
//!   commits; until then it reads from offset 0.
//! - **Explicit commits**: Pulling messages never advances a group's
//!   position. Progress moves only when the group commits, making
//!   redelivery after a crash the default behavior.
//! - **Last-write-wins**: Commits overwrite unconditionally, so a group
//!   can rewind itself to replay a partition.
//!
//! Topic and partition existence is validated by the caller; the
//! tracker itself never fails.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Allow these for cleaner code in this crate.
#![allow(clippy::module_name_repetitions)]

mod tracker;

// Re-export public API.
pub use tracker::{GroupKey, OffsetTracker};
