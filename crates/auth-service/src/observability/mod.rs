//! Observability for the auth service.
//!
//! # Privacy by Default
//!
//! Instrumented functions use `#[instrument(skip_all)]` and record fields
//! explicitly. Fields fall into three groups:
//! - **SAFE**: logged as-is (outcome labels, error categories, status codes)
//! - **HASHED**: SHA-256 prefix only, for correlation (token subjects, emails)
//! - **NEVER**: must not appear in logs (tokens, passwords, signing keys)

pub mod metrics;

pub use metrics::{
    init_metrics_recorder, record_auth_decision, record_token_issuance, record_token_validation,
};

use sha2::{Digest, Sha256};

/// Hash a value for log correlation (SHA-256, first 8 hex chars).
///
/// One-way and truncated. Good enough to follow one subject across log lines
/// without writing the email itself.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}
