//! Session token registry.
//!
//! Login binds a fresh random token to a user identity for the
//! lifetime of the process. Tokens are bearer credentials: whoever
//! presents one acts as the bound user. There is no expiry and no
//! revocation; a user logging in again simply holds two valid tokens.

use std::collections::HashMap;
use std::sync::RwLock;

use courier_core::{Token, UserId};
use tracing::info;

use crate::error::{AuthError, AuthResult};

/// Maps session tokens to user identities.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    /// Issued tokens by value.
    tokens: RwLock<HashMap<Token, UserId>>,
}

impl TokenRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a new token bound to `user`.
    ///
    /// Tokens are 128-bit random values, hex-encoded. A collision with
    /// an existing token is re-drawn; at 128 bits this is theoretical.
    ///
    /// # Panics
    ///
    /// Panics if the token lock is poisoned.
    pub fn login(&self, user: impl Into<UserId>) -> Token {
        let user = user.into();
        let mut tokens = self.tokens.write().expect("tokens lock poisoned");
        loop {
            let token = Token::new(format!("{:032x}", rand::random::<u128>()));
            if tokens.contains_key(&token) {
                continue;
            }
            tokens.insert(token.clone(), user.clone());
            info!(user = %user, "Issued session token");
            return token;
        }
    }

    /// Resolves a token to the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `UnknownToken` if the token was never issued here.
    ///
    /// # Panics
    ///
    /// Panics if the token lock is poisoned.
    pub fn resolve(&self, token: &Token) -> AuthResult<UserId> {
        let tokens = self.tokens.read().expect("tokens lock poisoned");
        tokens.get(token).cloned().ok_or(AuthError::UnknownToken)
    }

    /// Number of tokens issued so far.
    ///
    /// # Panics
    ///
    /// Panics if the token lock is poisoned.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.read().expect("tokens lock poisoned").len()
    }
}
