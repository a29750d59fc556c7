//! Builder patterns for test data construction
//!
//! Tokens built here are signed with jsonwebtoken directly, not through the
//! service's codec, so they can stand in for tokens from any HS256 issuer.

use crate::crypto_fixtures::test_secret_bytes;
use crate::test_ids::TEST_KEY_SEED_PRIMARY;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};

/// Builder for creating test tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("alice@example.com")
///     .with_claim("tenant", "blue")
///     .expires_in(Duration::seconds(60))
///     .build();
/// ```
pub struct TestTokenBuilder {
    sub: Option<String>,
    iat: i64,
    exp: i64,
    extra: Map<String, Value>,
    algorithm: Algorithm,
    secret: Vec<u8>,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    ///
    /// Issued now, valid for one hour, signed with the primary test secret.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: Some("test-subject@example.com".to_string()),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            extra: Map::new(),
            algorithm: Algorithm::HS256,
            secret: test_secret_bytes(TEST_KEY_SEED_PRIMARY),
        }
    }

    /// Set the subject
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = Some(subject.to_string());
        self
    }

    /// Leave the `sub` claim out entirely
    pub fn without_subject(mut self) -> Self {
        self.sub = None;
        self
    }

    /// Issue at `at`, keeping the current lifetime
    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        let lifetime = self.exp - self.iat;
        self.iat = at.timestamp();
        self.exp = self.iat + lifetime;
        self
    }

    /// Set the lifetime relative to issued-at
    pub fn expires_in(mut self, lifetime: Duration) -> Self {
        self.exp = self.iat + lifetime.num_seconds();
        self
    }

    /// Set an absolute `exp`, in seconds since the epoch
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Add an extra claim
    pub fn with_claim(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(name.to_string(), value.into());
        self
    }

    /// Sign with the test secret for `seed` instead of the primary one
    pub fn signed_with_seed(mut self, seed: u8) -> Self {
        self.secret = test_secret_bytes(seed);
        self
    }

    /// Sign with another HMAC algorithm (HS384, HS512)
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the claims JSON
    pub fn build_claims(&self) -> Value {
        let mut claims = self.extra.clone();
        if let Some(sub) = &self.sub {
            claims.insert("sub".to_string(), json!(sub));
        }
        claims.insert("iat".to_string(), json!(self.iat));
        claims.insert("exp".to_string(), json!(self.exp));
        Value::Object(claims)
    }

    /// Build and sign the token
    pub fn build(&self) -> String {
        jsonwebtoken::encode(
            &Header::new(self.algorithm),
            &self.build_claims(),
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("Failed to sign test token")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
