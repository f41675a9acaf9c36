//! Message records for Courier topics.
//!
//! A [`Message`] is the unit of data in a topic partition. It carries:
//! - **Offset**: position in the partition log (assigned by the broker on
//!   append, gapless and strictly increasing per partition)
//! - **Timestamp**: broker time at publish
//! - **Key**: optional routing hint; equal keys land on the same partition
//!   when the caller does not pin one
//! - **Payload**: opaque bytes, never inspected by the core
//! - **Producer**: the identity that published the message
//!
//! Messages are immutable once appended and are removed only by topic
//! deletion.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use crate::limits::Limits;
use crate::types::UserId;
use crate::{Error, Result};

/// Timestamp in microseconds since the Unix epoch.
///
/// All time in Courier is carried in microseconds: message timestamps,
/// lease deadlines, and the explicit `now_us` parameters threaded through
/// the stores share one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from microseconds since the Unix epoch.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Returns the timestamp as microseconds since the Unix epoch.
    #[must_use]
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    /// Returns the current wall-clock time as a timestamp.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Won't overflow i64 for centuries.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_micros() as i64)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// Offset in a partition log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(u64);

impl Offset {
    /// Creates an offset from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw offset value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the next offset.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the offset of the beginning of a log.
    #[must_use]
    pub const fn earliest() -> Self {
        Self(0)
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Offset {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// A single message in a topic partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Offset in the partition (assigned by the broker on append).
    pub offset: Offset,
    /// Broker time at publish.
    pub timestamp: Timestamp,
    /// Optional routing key. A hint for consumers and the partition
    /// router; never interpreted beyond that.
    pub key: Option<String>,
    /// The message payload. Opaque bytes end-to-end; any transport
    /// encoding (base64 and friends) happens outside the core.
    pub payload: Bytes,
    /// Identity that published the message.
    pub producer: UserId,
}

impl Message {
    /// Creates a new unassigned message (offset 0 until appended).
    #[must_use]
    pub fn new(payload: impl Into<Bytes>, producer: UserId) -> Self {
        Self {
            offset: Offset::default(),
            timestamp: Timestamp::now(),
            key: None,
            payload: payload.into(),
            producer,
        }
    }

    /// Sets the routing key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the offset (done by the partition log on append).
    pub fn set_offset(&mut self, offset: Offset) {
        self.offset = offset;
    }

    /// Validates the message against limits.
    ///
    /// # Errors
    /// Returns `LimitExceeded` if the payload or key exceeds its cap.
    #[allow(clippy::cast_possible_truncation)] // Sizes bounded by limits.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        if self.payload.len() as u64 > u64::from(limits.max_message_bytes) {
            return Err(Error::LimitExceeded {
                limit: "max_message_bytes",
                max: u64::from(limits.max_message_bytes),
                actual: self.payload.len() as u64,
            });
        }

        if let Some(ref key) = self.key {
            if key.len() as u64 > u64::from(limits.max_key_bytes) {
                return Err(Error::LimitExceeded {
                    limit: "max_key_bytes",
                    max: u64::from(limits.max_key_bytes),
                    actual: key.len() as u64,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_ordering() {
        let a = Offset::new(1);
        let b = Offset::new(2);

        assert!(a < b);
        assert_eq!(a.next(), b);
        assert_eq!(Offset::earliest().get(), 0);
    }

    #[test]
    fn test_message_builder() {
        let msg = Message::new(Bytes::from_static(b"payload"), UserId::new("alice"))
            .with_key("orders")
            .with_timestamp(Timestamp::from_micros(1_000_000));

        assert_eq!(msg.key.as_deref(), Some("orders"));
        assert_eq!(msg.timestamp.as_micros(), 1_000_000);
        assert_eq!(msg.offset, Offset::new(0));
    }

    #[test]
    fn test_message_validate_payload_cap() {
        let limits = Limits {
            max_message_bytes: 4,
            ..Limits::new()
        };
        let msg = Message::new(Bytes::from_static(b"too long"), UserId::new("alice"));

        let err = msg.validate(&limits).unwrap_err();
        assert!(matches!(
            err,
            Error::LimitExceeded {
                limit: "max_message_bytes",
                ..
            }
        ));
    }

    #[test]
    fn test_message_validate_key_cap() {
        let limits = Limits {
            max_key_bytes: 2,
            ..Limits::new()
        };
        let msg =
            Message::new(Bytes::from_static(b"ok"), UserId::new("alice")).with_key("long-key");

        assert!(msg.validate(&limits).is_err());
    }
}
