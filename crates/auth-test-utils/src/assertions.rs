//! Custom assertions for tokens
//!
//! These read the payload without verifying the signature; pair them with a
//! codec decode when the signature matters.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

fn segment_json(token: &str, index: usize) -> Value {
    let segment = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("Token has no segment {index}"));
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .unwrap_or_else(|e| panic!("Failed to base64 decode segment {index}: {e}"));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse segment {index} as JSON: {e}"))
}

/// Token assertion helpers
pub trait TokenAssertions {
    /// Assert compact HS256 shape with a JSON header and claims object
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert that `exp - iat` equals `seconds`
    fn assert_lifetime_secs(&self, seconds: i64) -> &Self;

    /// Assert that the token expires within `seconds` of now (5s tolerance)
    fn assert_expires_in(&self, seconds: i64) -> &Self;

    /// Assert an extra claim's JSON value
    fn assert_has_claim(&self, name: &str, expected: Value) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header = segment_json(self, 0);
        assert_eq!(header["alg"], "HS256", "Expected HS256 algorithm");
        assert_eq!(header["typ"], "JWT", "Expected JWT type");

        let claims = segment_json(self, 1);
        assert!(claims.is_object(), "JWT claims must be a JSON object");
        for reserved in ["sub", "iat", "exp"] {
            assert!(
                claims.get(reserved).is_some(),
                "JWT claims missing '{reserved}'"
            );
        }

        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims = segment_json(self, 1);
        assert_eq!(
            claims["sub"].as_str(),
            Some(subject),
            "Expected subject '{}', got {}",
            subject,
            claims["sub"]
        );
        self
    }

    fn assert_lifetime_secs(&self, seconds: i64) -> &Self {
        let claims = segment_json(self, 1);
        let iat = claims["iat"].as_i64().expect("iat must be an integer");
        let exp = claims["exp"].as_i64().expect("exp must be an integer");
        assert_eq!(exp - iat, seconds, "Unexpected token lifetime");
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims = segment_json(self, 1);
        let exp = claims["exp"].as_i64().expect("exp must be an integer");
        let expires_in = exp - chrono::Utc::now().timestamp();

        // Allow 5-second tolerance for slow test runs
        assert!(
            (expires_in - seconds).abs() <= 5,
            "Token expires in {}s, expected ~{}s",
            expires_in,
            seconds
        );
        self
    }

    fn assert_has_claim(&self, name: &str, expected: Value) -> &Self {
        let claims = segment_json(self, 1);
        assert_eq!(
            claims.get(name),
            Some(&expected),
            "Claim '{}' mismatch",
            name
        );
        self
    }
}
