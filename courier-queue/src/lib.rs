//! FIFO queues with lease-based redelivery for Courier.
//!
//! Unlike a topic, where reads never consume, a queue delivers each
//! message to one consumer at a time. Dequeuing leases the message for
//! a TTL instead of removing it: an ack inside the deadline settles it
//! permanently, while a missed deadline makes the message visible
//! again for redelivery.
//!
//! # Lifecycle
//!
//! ```text
//! enqueue ──► Visible ──dequeue──► Leased ──ack──► removed
//!                ▲                    │
//!                └──── lease expiry ──┘
//! ```
//!
//! Redelivered messages keep their id, payload, and FIFO position;
//! only the delivery count changes. This gives at-least-once delivery:
//! a consumer that crashes mid-job loses nothing but time.
//!
//! # Example
//!
//! ```ignore
//! use courier_queue::QueueStore;
//! use courier_core::{Limits, UserId};
//!
//! let store = QueueStore::new(Limits::new());
//! store.create("jobs", UserId::new("alice"))?;
//!
//! let id = store.enqueue("jobs", b"resize image".to_vec(), UserId::new("alice"), now_us)?;
//! if let Some(msg) = store.dequeue("jobs", now_us, 30_000_000)? {
//!     // ... process ...
//!     store.ack("jobs", msg.id)?;
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Allow these for cleaner code in this crate.
#![allow(clippy::module_name_repetitions)]

mod error;
mod store;
mod types;

// Re-export public API.
pub use error::{QueueError, QueueResult};
pub use store::QueueStore;
pub use types::{LeaseState, QueueMessage, QueueSummary};
