//! In-memory append-only partition log.
//!
//! Each partition owns one `PartitionLog`: a contiguous vector of
//! messages where a message's offset equals its index. Offsets are
//! assigned at append time and never reused, so a reader holding an
//! offset can always resume from where it left off.

use courier_core::{Message, Offset, Timestamp};

/// An append-only sequence of messages for a single partition.
///
/// Offsets are dense: the message at offset `n` lives at index `n`,
/// which makes reads a bounds-checked slice copy.
#[derive(Debug, Default)]
pub struct PartitionLog {
    /// Messages in offset order.
    messages: Vec<Message>,
    /// The offset the next appended message will receive.
    next_offset: Offset,
}

impl PartitionLog {
    /// Creates an empty log starting at offset 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_offset: Offset::earliest(),
        }
    }

    /// Appends a message, stamping it with the next offset and the
    /// supplied append time. Returns the assigned offset.
    #[allow(clippy::cast_possible_wrap)]
    pub fn append(&mut self, mut message: Message, now_us: u64) -> Offset {
        let offset = self.next_offset;
        message.set_offset(offset);
        message = message.with_timestamp(Timestamp::from_micros(now_us as i64));
        self.messages.push(message);
        self.next_offset = offset.next();
        offset
    }

    /// Reads up to `max` messages starting at `from`.
    ///
    /// An out-of-range `from` yields an empty vector rather than an
    /// error: the caller may simply have caught up with the head.
    #[must_use]
    pub fn read(&self, from: Offset, max: usize) -> Vec<Message> {
        let Ok(start) = usize::try_from(from.get()) else {
            return Vec::new();
        };
        if start >= self.messages.len() || max == 0 {
            return Vec::new();
        }
        let end = start.saturating_add(max).min(self.messages.len());
        self.messages[start..end].to_vec()
    }

    /// The offset the next append will receive. Equals the number of
    /// messages in the log.
    #[must_use]
    pub const fn end_offset(&self) -> Offset {
        self.next_offset
    }

    /// Number of messages held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
