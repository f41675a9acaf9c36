//! Queue store error types.

use courier_core::MessageId;
use thiserror::Error;

/// Result type for queue store operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors that can occur during queue operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Queue not found.
    #[error("queue not found: {queue}")]
    QueueNotFound {
        /// The queue name.
        queue: String,
    },

    /// A queue with this name already exists.
    #[error("queue already exists: {queue}")]
    QueueExists {
        /// The queue name.
        queue: String,
    },

    /// Delete requested by an identity that did not create the queue.
    #[error("only the creator may delete queue {queue}")]
    NotCreator {
        /// The queue name.
        queue: String,
    },

    /// No message with this id exists in the queue.
    #[error("message {id} not found in queue {queue}")]
    MessageNotFound {
        /// The queue name.
        queue: String,
        /// The acked message id.
        id: MessageId,
    },

    /// An invalid argument was provided.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The name of the argument.
        name: &'static str,
        /// Why it was invalid.
        reason: &'static str,
    },

    /// A resource limit was exceeded.
    #[error("limit exceeded: {limit} (max={max}, actual={actual})")]
    LimitExceeded {
        /// Which limit was exceeded.
        limit: &'static str,
        /// The maximum allowed value.
        max: u64,
        /// The actual value that exceeded the limit.
        actual: u64,
    },
}

impl From<courier_core::Error> for QueueError {
    fn from(err: courier_core::Error) -> Self {
        match err {
            courier_core::Error::InvalidArgument { name, reason } => {
                Self::InvalidArgument { name, reason }
            }
            courier_core::Error::LimitExceeded { limit, max, actual } => {
                Self::LimitExceeded { limit, max, actual }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueueError::MessageNotFound {
            queue: "jobs".to_string(),
            id: MessageId::new(7),
        };
        let msg = err.to_string();
        assert!(msg.contains("jobs"));
        assert!(msg.contains("msg-7"));
    }
}
