//! HS256 token encoding and verification.
//!
//! Tokens are compact `header.payload.signature` strings. The signature is
//! HMAC-SHA256 over `header.payload` with the process-wide [`SigningKey`].
//! Decoding always enforces expiry; there is no way to read claims out of an
//! expired token through this type.

use crate::auth::claims::{Claims, ExtraClaims};
use crate::auth::clock::{Clock, SystemClock};
use crate::crypto::SigningKey;
use crate::errors::TokenError;
use crate::observability::{hash_for_correlation, record_token_validation};
use chrono::{DateTime, Utc};
use common::jwt::split_compact;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Encodes and verifies tokens with one signing key.
///
/// Holds only immutable state, so one instance is shared (behind an `Arc`)
/// by every request task.
pub struct TokenCodec {
    key: Arc<SigningKey>,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self::with_clock(key, Arc::new(SystemClock))
    }

    /// Build a codec whose notion of "now" comes from `clock`.
    pub fn with_clock(key: Arc<SigningKey>, clock: Arc<dyn Clock>) -> Self {
        // Only HS256 is accepted; a token claiming any other alg fails the
        // signature step. Expiry is checked here with millisecond precision
        // against the injected clock, so jsonwebtoken's own second-resolution
        // wall-clock check is disabled.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        Self {
            key,
            validation,
            clock,
        }
    }

    /// Current time according to this codec's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Sign a token for `subject` issued at `issued_at`.
    ///
    /// Extra claims go in first; `sub`, `iat` and `exp` are set last and
    /// cannot be overridden. `iat` is `issued_at` truncated to whole seconds
    /// and `exp` is `iat` plus `expires_in` rounded up to whole seconds, so a
    /// sub-second lifetime still yields a token that is valid on arrival.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if an extra claim is a non-finite float
    /// or the expiry does not fit in a timestamp.
    #[instrument(skip_all, name = "auth.token.encode")]
    pub fn encode(
        &self,
        subject: &str,
        extra: ExtraClaims,
        issued_at: DateTime<Utc>,
        expires_in: Duration,
    ) -> Result<String, TokenError> {
        if let Some((name, _)) = extra.iter().find(|(_, value)| !value.is_serializable()) {
            return Err(TokenError::Encoding(format!(
                "claim '{name}' is not representable in JSON"
            )));
        }

        let iat = issued_at.timestamp();
        let lifetime_secs = expires_in
            .as_secs()
            .checked_add(u64::from(expires_in.subsec_nanos() > 0))
            .and_then(|secs| i64::try_from(secs).ok())
            .ok_or_else(|| TokenError::Encoding("expiration out of range".to_string()))?;
        let exp = iat
            .checked_add(lifetime_secs)
            .ok_or_else(|| TokenError::Encoding("expiration overflows".to_string()))?;

        let claims = Claims::new(subject, iat, exp, extra);

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.key.encoding_key(),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Sign a token for `subject` issued now.
    ///
    /// # Errors
    ///
    /// Same as [`TokenCodec::encode`].
    pub fn issue(
        &self,
        subject: &str,
        extra: ExtraClaims,
        expires_in: Duration,
    ) -> Result<String, TokenError> {
        self.encode(subject, extra, self.now(), expires_in)
    }

    /// Verify `token` and return its claims.
    ///
    /// Checks run in order: structure, signature (constant-time), claim
    /// shape, expiry. A token only reaches the expiry check once its
    /// signature is known good.
    ///
    /// # Errors
    ///
    /// - `TokenError::Malformed` for anything that is not a three-segment
    ///   token with a JSON header and a scalar-valued claims object
    /// - `TokenError::Signature` if the signature does not match this key or
    ///   the header names an algorithm other than HS256
    /// - `TokenError::Expired` if `exp` is at or before the clock's now
    #[instrument(skip_all, name = "auth.token.decode")]
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let result = self.verify(token);
        match &result {
            Ok(_) => record_token_validation("success", None),
            Err(e) => record_token_validation("error", Some(e.category())),
        }
        result
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        split_compact(token).map_err(|e| {
            tracing::debug!(target: "auth.token", error = %e, "Token rejected: bad structure");
            TokenError::Malformed
        })?;

        let data = jsonwebtoken::decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    tracing::warn!(
                        target: "auth.token",
                        kind = ?e.kind(),
                        "Token rejected: signature verification failed"
                    );
                    TokenError::Signature
                }
                _ => {
                    tracing::debug!(target: "auth.token", error = %e, "Token rejected: malformed");
                    TokenError::Malformed
                }
            })?;

        let claims = data.claims;
        if claims.is_expired_at(self.now()) {
            tracing::info!(
                target: "auth.token",
                subject_hash = %hash_for_correlation(claims.subject()),
                exp = claims.expires_at(),
                "Token rejected: expired"
            );
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
