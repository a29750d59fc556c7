//! Compact JWT structure checks and bearer header parsing.
//!
//! These helpers run BEFORE any cryptographic work:
//! - Size limit for DoS prevention
//! - Three-segment `header.payload.signature` structure
//! - Header decodes to a JSON object
//! - `Authorization: Bearer <token>` extraction
//!
//! Nothing here verifies a signature. A token that passes [`split_compact`]
//! is only well-shaped; it still has to be verified with the signing key.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Typical tokens issued by this service are 150-300 bytes. Anything larger
/// than this is rejected before base64 decoding or HMAC computation.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Literal scheme prefix of a bearer `Authorization` header, including the
/// single separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// Error Types
// =============================================================================

/// Structural problems found before signature verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtStructureError {
    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("token exceeds maximum size")]
    TokenTooLarge,

    /// Token does not have exactly three dot-separated segments.
    #[error("expected 3 token segments, found {0}")]
    WrongSegmentCount(usize),

    /// One of the three segments is empty.
    #[error("token contains an empty segment")]
    EmptySegment,

    /// Header segment is not base64url-encoded JSON object.
    #[error("token header is not a valid JSON object")]
    InvalidHeader,
}

// =============================================================================
// Types
// =============================================================================

/// Borrowed view over the three segments of a compact token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactParts<'a> {
    /// Base64url header segment.
    pub header: &'a str,
    /// Base64url claims segment.
    pub payload: &'a str,
    /// Base64url signature segment.
    pub signature: &'a str,
}

// =============================================================================
// Functions
// =============================================================================

/// Split a compact token into its segments after size and shape checks.
///
/// # Errors
///
/// - `TokenTooLarge` if the token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `WrongSegmentCount` unless there are exactly three segments
/// - `EmptySegment` if any segment is empty
/// - `InvalidHeader` if the header is not base64url JSON object
pub fn split_compact(token: &str) -> Result<CompactParts<'_>, JwtStructureError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtStructureError::TokenTooLarge);
    }

    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        let count = token.split('.').count();
        tracing::debug!(target: "common.jwt", parts = count, "Token rejected: invalid JWT format");
        return Err(JwtStructureError::WrongSegmentCount(count));
    };

    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(JwtStructureError::EmptySegment);
    }

    let header_bytes = URL_SAFE_NO_PAD.decode(header).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtStructureError::InvalidHeader
    })?;

    let header_json: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtStructureError::InvalidHeader
    })?;

    if !header_json.is_object() {
        return Err(JwtStructureError::InvalidHeader);
    }

    Ok(CompactParts {
        header,
        payload,
        signature,
    })
}

/// Extract the raw token from an `Authorization` header value.
///
/// Returns `None` unless the value starts with the exact prefix `"Bearer "`
/// (case-sensitive, one space). Anything else is treated as "no bearer
/// token", not as an error.
#[must_use]
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix(BEARER_PREFIX)
}
