//! Deterministic signing secret fixtures for testing
//!
//! All fixtures are derived from a seed byte. The same seed always produces
//! the same secret, so tokens minted in one test can be verified in another.

use auth_service::crypto::SigningKey;
use base64::engine::general_purpose;
use base64::Engine;
use std::sync::Arc;
use thiserror::Error;

/// Test fixture error type
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Signing key rejected: {0}")]
    Key(String),
}

/// Raw 32-byte signing secret for `seed`.
///
/// # Example
/// ```rust,ignore
/// assert_eq!(test_secret_bytes(1), test_secret_bytes(1));
/// assert_ne!(test_secret_bytes(1), test_secret_bytes(2));
/// ```
pub fn test_secret_bytes(seed: u8) -> Vec<u8> {
    (0u8..32)
        .map(|i| seed.wrapping_mul(31).wrapping_add(i.wrapping_mul(7)) ^ 0x5a)
        .collect()
}

/// Base64 form of [`test_secret_bytes`], as `JWT_SECRET_KEY` expects.
pub fn test_secret_base64(seed: u8) -> String {
    general_purpose::STANDARD.encode(test_secret_bytes(seed))
}

/// Signing key built through the service's own key derivation.
pub fn test_signing_key(seed: u8) -> Result<Arc<SigningKey>, FixtureError> {
    SigningKey::from_base64_secret(&test_secret_base64(seed))
        .map(Arc::new)
        .map_err(|e| FixtureError::Key(e.to_string()))
}
