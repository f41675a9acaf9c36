//! System limits and configuration bounds.
//!
//! Put limits on everything: every registry, log, and queue has an explicit
//! maximum size. This keeps a malfunctioning producer from growing the
//! in-memory broker without bound and makes behavior predictable.

/// System-wide limits for a Courier broker.
///
/// Defaults are safe for a development or demo deployment; production
/// embeddings should tune them to their memory budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    // Message limits.
    /// Maximum size of a single message payload in bytes (topics and
    /// queues share this cap).
    pub max_message_bytes: u32,
    /// Maximum size of a routing key in bytes.
    pub max_key_bytes: u32,

    // Topic limits.
    /// Maximum number of topics.
    pub max_topics: u32,
    /// Maximum number of partitions a topic may be created with.
    pub max_partitions_per_topic: u32,
    /// Maximum messages returned by a single pull.
    pub max_pull_messages: u32,

    // Queue limits.
    /// Maximum number of queues.
    pub max_queues: u32,
    /// Maximum messages resident in one queue (visible plus leased).
    pub max_queue_depth: u32,
}

impl Limits {
    /// Creates limits with safe defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            // Messages: 1MB payload, 1KB key.
            max_message_bytes: 1024 * 1024,
            max_key_bytes: 1024,

            // Topics: 1024 topics, 64 partitions each, 1000-message pulls.
            max_topics: 1024,
            max_partitions_per_topic: 64,
            max_pull_messages: 1000,

            // Queues: 1024 queues, 64k resident messages each.
            max_queues: 1024,
            max_queue_depth: 65_536,
        }
    }

    /// Validates that all limits are internally consistent.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if any limit is zero.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_message_bytes == 0 {
            return Err(crate::Error::InvalidArgument {
                name: "max_message_bytes",
                reason: "must be positive",
            });
        }

        if self.max_partitions_per_topic == 0 {
            return Err(crate::Error::InvalidArgument {
                name: "max_partitions_per_topic",
                reason: "must be positive",
            });
        }

        if self.max_pull_messages == 0 {
            return Err(crate::Error::InvalidArgument {
                name: "max_pull_messages",
                reason: "must be positive",
            });
        }

        if self.max_queue_depth == 0 {
            return Err(crate::Error::InvalidArgument {
                name: "max_queue_depth",
                reason: "must be positive",
            });
        }

        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_are_valid() {
        assert!(Limits::new().validate().is_ok());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let limits = Limits {
            max_message_bytes: 0,
            ..Limits::new()
        };
        assert!(limits.validate().is_err());
    }
}
