//! Identity-bound token validation.

use crate::auth::claims::Claims;
use crate::auth::codec::TokenCodec;
use crate::errors::TokenError;
use std::sync::Arc;

/// Decides whether a token is good for a given identity.
#[derive(Clone)]
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
}

impl TokenValidator {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Subject of a verified, unexpired token.
    ///
    /// # Errors
    ///
    /// Whatever [`TokenCodec::decode`] returns.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.codec.decode(token).map(|claims| claims.subject().to_string())
    }

    /// True iff `token` verifies, is unexpired, and its subject equals
    /// `expected_identity` exactly. Case is significant.
    ///
    /// Decode failures are folded into `false`.
    pub fn is_valid(&self, token: &str, expected_identity: &str) -> bool {
        match self.codec.decode(token) {
            Ok(claims) => self.is_valid_for(&claims, expected_identity),
            Err(_) => false,
        }
    }

    /// Same decision as [`TokenValidator::is_valid`] for claims already decoded.
    pub fn is_valid_for(&self, claims: &Claims, expected_identity: &str) -> bool {
        // decode already enforced expiry; the clock may have moved since
        claims.subject() == expected_identity && !claims.is_expired_at(self.codec.now())
    }
}
