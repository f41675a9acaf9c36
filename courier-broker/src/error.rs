//! Broker error types and the wire-facing error taxonomy.

use courier_queue::QueueError;
use courier_topic::TopicError;

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Coarse error classification exposed to callers of the facade.
///
/// A transport layer maps these to its own status codes; the broker
/// core keeps the full typed error underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The token does not identify any user.
    Unauthorized,
    /// The caller is known but not allowed to do this.
    Forbidden,
    /// The named resource (or message id) does not exist.
    NotFound,
    /// The resource already exists.
    Conflict,
    /// An argument failed validation.
    InvalidArgument,
    /// A configured resource limit was exceeded.
    LimitExceeded,
}

impl ErrorKind {
    /// Stable lowercase name for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidArgument => "invalid_argument",
            Self::LimitExceeded => "limit_exceeded",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broker error type.
///
/// Wraps the store-level errors; [`BrokerError::kind`] collapses them
/// into the [`ErrorKind`] taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// An auth operation failed.
    #[error(transparent)]
    Auth {
        /// The underlying auth error.
        #[from]
        source: courier_auth::AuthError,
    },

    /// A topic store operation failed.
    #[error(transparent)]
    Topic {
        /// The underlying topic error.
        #[from]
        source: TopicError,
    },

    /// A queue store operation failed.
    #[error(transparent)]
    Queue {
        /// The underlying queue error.
        #[from]
        source: QueueError,
    },

    /// Configuration rejected at construction.
    #[error(transparent)]
    Config {
        /// The underlying validation error.
        #[from]
        source: courier_core::Error,
    },

    /// An invalid argument reached the facade.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The name of the argument.
        name: &'static str,
        /// Why it was invalid.
        reason: &'static str,
    },
}

impl BrokerError {
    /// Classifies the error for the wire taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth { .. } => ErrorKind::Unauthorized,
            Self::Topic { source } => match source {
                TopicError::TopicNotFound { .. } | TopicError::PartitionNotFound { .. } => {
                    ErrorKind::NotFound
                }
                TopicError::TopicExists { .. } => ErrorKind::Conflict,
                TopicError::NotCreator { .. } => ErrorKind::Forbidden,
                TopicError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
                TopicError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            },
            Self::Queue { source } => match source {
                QueueError::QueueNotFound { .. } | QueueError::MessageNotFound { .. } => {
                    ErrorKind::NotFound
                }
                QueueError::QueueExists { .. } => ErrorKind::Conflict,
                QueueError::NotCreator { .. } => ErrorKind::Forbidden,
                QueueError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
                QueueError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            },
            Self::Config { source } => match source {
                courier_core::Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
                courier_core::Error::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            },
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}
