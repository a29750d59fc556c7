//! Claims carried inside an issued token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Claim names owned by the codec. Extra claims with these names are
/// discarded at encode time so they can never override the real values.
pub const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Value of an extra (non-reserved) claim.
///
/// Deliberately scalar-only: a payload carrying arrays, objects or nulls in an
/// extra claim does not decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// False only for NaN and infinite floats, which JSON cannot carry.
    pub(crate) fn is_serializable(&self) -> bool {
        match self {
            ClaimValue::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Float(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

/// Extra claims keyed by claim name.
pub type ExtraClaims = BTreeMap<String, ClaimValue>;

/// Verified token claims.
///
/// Only the codec constructs these, so holding a `Claims` means the signature
/// checked out. Accessors are read-only. The subject is an email and is
/// redacted from Debug output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    extra: ExtraClaims,
}

impl Claims {
    /// Reserved values are applied after the extras, so they always win.
    pub(crate) fn new(subject: &str, iat: i64, exp: i64, mut extra: ExtraClaims) -> Self {
        extra.retain(|name, _| !RESERVED_CLAIMS.contains(&name.as_str()));
        Self {
            sub: subject.to_string(),
            iat,
            exp,
            extra,
        }
    }

    /// Subject (the user's email).
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Issued-at, seconds since the Unix epoch.
    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    /// Expiration, seconds since the Unix epoch.
    pub fn expires_at(&self) -> i64 {
        self.exp
    }

    /// Look up an extra claim by name.
    pub fn extra(&self, name: &str) -> Option<&ClaimValue> {
        self.extra.get(name)
    }

    pub fn extra_claims(&self) -> &ExtraClaims {
        &self.extra
    }

    /// Expired when `exp` is at or before `now`.
    ///
    /// Compared at millisecond resolution: a token whose `exp` second has
    /// started is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp.saturating_mul(1000) <= now.timestamp_millis()
    }
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}
