//! Strongly-typed identifiers for Courier entities.
//!
//! Explicit types prevent bugs from mixing up identifiers: a queue
//! `MessageId` is not a `PartitionIndex` even though both wrap a u64, and
//! a `Token` is not a `UserId` even though both wrap a string.

use std::fmt;

/// Macro to generate strongly-typed u64 ID wrappers.
///
/// Each ID type wraps a u64 and provides:
/// - Type safety (can't mix `MessageId` with `PartitionIndex`)
/// - Debug/Display formatting
/// - Zero-cost abstraction (same as raw u64)
macro_rules! define_id {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new ID from a raw u64 value.
            #[inline]
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw u64 value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Returns the next ID in sequence.
            ///
            /// # Panics
            /// Panics if the ID would overflow.
            #[inline]
            #[must_use]
            pub const fn next(self) -> Self {
                assert!(self.0 < u64::MAX, "ID overflow");
                Self(self.0 + 1)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $prefix, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.get()
            }
        }
    };
}

define_id!(
    MessageId,
    "msg",
    "Unique identifier for a queue message, assigned at enqueue."
);
define_id!(
    PartitionIndex,
    "partition",
    "Index of a partition within a topic (0..N-1, N fixed at topic creation)."
);

/// Macro to generate strongly-typed string wrappers.
///
/// Same discipline as `define_id!` but for opaque string-valued
/// identifiers owned by the auth layer.
macro_rules! define_name {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_name!(
    UserId,
    "Opaque user identity, established at login and recorded as the creator \
     of topics and queues and the producer of messages."
);
define_name!(
    Token,
    "Opaque bearer token issued 1:1 per login; resolves to exactly one \
     [`UserId`] for the lifetime of the process session."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_safety() {
        let msg = MessageId::new(7);
        let partition = PartitionIndex::new(7);

        // Same raw value, different types; comparing them won't compile.
        assert_eq!(msg.get(), partition.get());
    }

    #[test]
    fn test_id_display() {
        let id = MessageId::new(42);
        assert_eq!(format!("{id}"), "msg-42");
        assert_eq!(format!("{id:?}"), "msg(42)");
    }

    #[test]
    fn test_id_next() {
        let id = MessageId::new(0);
        assert_eq!(id.next().get(), 1);
        assert_eq!(id.next().next().get(), 2);
    }

    #[test]
    #[should_panic(expected = "ID overflow")]
    fn test_id_overflow_panics() {
        let id = MessageId::new(u64::MAX);
        let _ = id.next();
    }

    #[test]
    fn test_name_round_trip() {
        let user = UserId::new("alice");
        assert_eq!(user.as_str(), "alice");
        assert_eq!(format!("{user}"), "alice");

        let token = Token::from("deadbeef");
        assert_eq!(token, Token::new(String::from("deadbeef")));
    }
}
