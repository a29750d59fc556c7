use crate::config::{ConfigError, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::AuthError;
use base64::{engine::general_purpose, Engine as _};
use common::secret::{ExposeSecret, SecretBox};
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::fmt;
use tracing::instrument;

/// Minimum HMAC-SHA256 key length in bytes.
///
/// RFC 7518 §3.2: a key of the same size as the hash output (256 bits) or
/// larger MUST be used with HS256.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

/// Plaintext behind the dummy hash. The verification result is discarded, so
/// knowing it grants nothing.
const DUMMY_PASSWORD_INPUT: &str = "unknown-user-timing-placeholder";

/// Symmetric HS256 signing key.
///
/// Derived once at startup from the configured base64 secret and shared
/// read-only (behind an `Arc`) by every codec. The jsonwebtoken key handles
/// are built here, once, so per-request decode never re-derives anything.
pub struct SigningKey {
    raw: SecretBox<Vec<u8>>,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Derive the key from a standard-alphabet base64 secret.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidSigningSecret` if the secret is blank or decodes
    ///   to fewer than [`MIN_SIGNING_KEY_BYTES`]
    /// - `ConfigError::Base64Error` if the secret is not valid base64
    pub fn from_base64_secret(secret: &str) -> Result<Self, ConfigError> {
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidSigningSecret(
                "secret is empty".to_string(),
            ));
        }

        let bytes = general_purpose::STANDARD.decode(trimmed)?;
        Self::from_bytes(bytes)
    }

    /// Build the key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSigningSecret` if fewer than
    /// [`MIN_SIGNING_KEY_BYTES`] bytes are supplied.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ConfigError> {
        if bytes.len() < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::InvalidSigningSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_SIGNING_KEY_BYTES,
                bytes.len()
            )));
        }

        let encoding = EncodingKey::from_secret(&bytes);
        let decoding = DecodingKey::from_secret(&bytes);

        Ok(Self {
            raw: SecretBox::new(Box::new(bytes)),
            encoding,
            decoding,
        })
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.raw.expose_secret().len()
    }

    /// Always false; construction rejects short keys.
    pub fn is_empty(&self) -> bool {
        self.raw.expose_secret().is_empty()
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("raw", &"[REDACTED]")
            .field("len", &self.len())
            .finish()
    }
}

/// Hash a password with bcrypt using the configured cost factor.
///
/// # Errors
///
/// Returns `AuthError::Crypto` if the cost is outside
/// `MIN_BCRYPT_COST..=MAX_BCRYPT_COST` or bcrypt fails.
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(AuthError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| AuthError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AuthError::Crypto(format!("Password verification failed: {}", e)))
}

/// Hash verified against when a login names an unknown email.
///
/// Built once at startup with the configured cost so that branch pays the
/// same bcrypt work as a wrong password.
///
/// # Errors
///
/// Same as [`hash_password`].
pub fn dummy_password_hash(cost: u32) -> Result<String, AuthError> {
    hash_password(DUMMY_PASSWORD_INPUT, cost)
}

/// Burn one bcrypt verification against `dummy_hash`.
#[instrument(skip_all)]
pub fn verify_dummy_password(password: &str, dummy_hash: &str) {
    let _ = bcrypt::verify(password, dummy_hash);
}
