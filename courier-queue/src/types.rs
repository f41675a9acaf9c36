//! Queue message types and lease lifecycle.

use bytes::Bytes;
use courier_core::{MessageId, Timestamp, UserId};

// -----------------------------------------------------------------------------
// Lease State
// -----------------------------------------------------------------------------

/// Visibility of a queue message.
///
/// A message is either visible (deliverable by the next dequeue) or
/// leased to whichever consumer last dequeued it. Leases are
/// holder-agnostic: the queue records the deadline, not the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseState {
    /// Deliverable: the next dequeue may claim this message.
    Visible,
    /// Claimed by a consumer until the deadline passes.
    Leased {
        /// When the lease expires (microseconds). At or after this
        /// instant the message reverts to `Visible`.
        expires_at_us: u64,
    },
}

impl LeaseState {
    /// Whether a lease has expired at `now_us`.
    ///
    /// `Visible` messages are never expired; they have no lease.
    #[must_use]
    pub const fn is_expired(&self, now_us: u64) -> bool {
        match self {
            Self::Visible => false,
            Self::Leased { expires_at_us } => now_us >= *expires_at_us,
        }
    }

    /// Whether the message is deliverable at `now_us`.
    #[must_use]
    pub const fn is_visible(&self, now_us: u64) -> bool {
        match self {
            Self::Visible => true,
            Self::Leased { .. } => self.is_expired(now_us),
        }
    }
}

// -----------------------------------------------------------------------------
// Queue Message
// -----------------------------------------------------------------------------

/// A message held by a queue.
///
/// The id is assigned at enqueue and survives lease expiry: a message
/// redelivered after a missed deadline carries the same id, payload,
/// and FIFO position as its first delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Store-wide unique id, assigned at enqueue.
    pub id: MessageId,
    /// Opaque message payload.
    pub payload: Bytes,
    /// Identity that enqueued the message.
    pub producer: UserId,
    /// When the message was enqueued.
    pub enqueued_at: Timestamp,
    /// How many times the message has been delivered. Incremented on
    /// each dequeue, so the first delivery observes 1.
    pub delivery_count: u32,
    /// Current visibility.
    pub state: LeaseState,
}

impl QueueMessage {
    /// Creates a visible, never-delivered message.
    pub fn new(
        id: MessageId,
        payload: impl Into<Bytes>,
        producer: UserId,
        enqueued_at: Timestamp,
    ) -> Self {
        Self {
            id,
            payload: payload.into(),
            producer,
            enqueued_at,
            delivery_count: 0,
            state: LeaseState::Visible,
        }
    }
}

// -----------------------------------------------------------------------------
// Queue Summary
// -----------------------------------------------------------------------------

/// Metadata snapshot of a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSummary {
    /// Queue name.
    pub name: String,
    /// Identity that created the queue.
    pub creator: UserId,
    /// Messages currently deliverable.
    pub visible: usize,
    /// Messages currently under an unexpired lease.
    pub leased: usize,
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
