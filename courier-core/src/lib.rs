//! Courier Core - Strongly-typed identifiers, records, and limits for
//! Courier.
//!
//! This crate provides the shared vocabulary of the broker: offset and ID
//! newtypes, the topic [`Message`] record, and explicit system [`Limits`].
//! It holds no state and does no I/O.
//!
//! # Design Principles
//!
//! - **Strongly-typed IDs**: Prevent mixing up a `MessageId` with a
//!   `PartitionIndex`, or a `Token` with a `UserId`
//! - **Explicit limits**: Every resource has a bounded maximum
//! - **Opaque payloads**: Message bodies are [`bytes::Bytes`] end-to-end
//! - **No unsafe code**

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod limits;
mod record;
mod types;

pub use error::{Error, Result};
pub use limits::Limits;
pub use record::{Message, Offset, Timestamp};
pub use types::{MessageId, PartitionIndex, Token, UserId};
