//! Auth error types.

use thiserror::Error;

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur during auth operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The presented token is not registered.
    ///
    /// The token value is deliberately not echoed back.
    #[error("unrecognized token")]
    UnknownToken,
}
