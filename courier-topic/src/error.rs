//! Topic store error types.

use courier_core::PartitionIndex;
use thiserror::Error;

/// Result type for topic store operations.
pub type TopicResult<T> = Result<T, TopicError>;

/// Errors that can occur during topic operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopicError {
    /// Topic not found.
    #[error("topic not found: {topic}")]
    TopicNotFound {
        /// The topic name.
        topic: String,
    },

    /// Partition index out of range for the topic.
    #[error("partition {partition} not found in topic {topic}")]
    PartitionNotFound {
        /// The topic name.
        topic: String,
        /// The requested partition index.
        partition: PartitionIndex,
    },

    /// A topic with this name already exists.
    #[error("topic already exists: {topic}")]
    TopicExists {
        /// The topic name.
        topic: String,
    },

    /// Delete requested by an identity that did not create the topic.
    #[error("only the creator may delete topic {topic}")]
    NotCreator {
        /// The topic name.
        topic: String,
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

impl From<courier_core::Error> for TopicError {
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
