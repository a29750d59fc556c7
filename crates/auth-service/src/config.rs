use crate::crypto::SigningKey;
use axum::http::HeaderValue;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default token lifetime (1 hour) in milliseconds.
pub const DEFAULT_JWT_EXPIRATION_MS: u64 = 3_600_000;

/// Default bcrypt cost factor (2^12 iterations, ~200ms per hash).
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Minimum bcrypt cost accepted from configuration.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Maximum bcrypt cost accepted from configuration.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Default browser origin allowed by CORS.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:8005";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// PostgreSQL URL. When absent the service keeps users in memory.
    pub database_url: Option<String>,
    /// HMAC key derived once from `JWT_SECRET_KEY`.
    pub signing_key: Arc<SigningKey>,
    pub jwt_expiration_ms: u64,
    pub bcrypt_cost: u32,
    pub cors_allowed_origin: HeaderValue,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing secret: {0}")]
    InvalidSigningSecret(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Invalid token expiration: {0}")]
    InvalidExpiration(String),

    #[error("Invalid bcrypt cost: {0}")]
    InvalidBcryptCost(String),

    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let database_url = vars
            .get("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .cloned();

        let secret = vars
            .get("JWT_SECRET_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET_KEY".to_string()))?;

        let signing_key = SigningKey::from_base64_secret(secret)?;

        let jwt_expiration_ms = match vars.get("JWT_EXPIRATION_MS") {
            Some(raw) => parse_expiration_ms(raw)?,
            None => DEFAULT_JWT_EXPIRATION_MS,
        };

        let bcrypt_cost = match vars.get("BCRYPT_COST") {
            Some(raw) => parse_bcrypt_cost(raw)?,
            None => DEFAULT_BCRYPT_COST,
        };

        let origin = vars
            .get("CORS_ALLOWED_ORIGIN")
            .map(String::as_str)
            .unwrap_or(DEFAULT_CORS_ALLOWED_ORIGIN);
        let cors_allowed_origin = HeaderValue::from_str(origin)
            .map_err(|e| ConfigError::InvalidCorsOrigin(format!("{origin}: {e}")))?;

        Ok(Config {
            bind_address,
            database_url,
            signing_key: Arc::new(signing_key),
            jwt_expiration_ms,
            bcrypt_cost,
            cors_allowed_origin,
        })
    }

    /// Token lifetime added to issued-at when minting tokens.
    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_millis(self.jwt_expiration_ms)
    }
}

fn parse_expiration_ms(raw: &str) -> Result<u64, ConfigError> {
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidExpiration(format!("not a positive integer: {raw}")))?;

    if value == 0 {
        return Err(ConfigError::InvalidExpiration(
            "must be greater than zero".to_string(),
        ));
    }

    // chrono durations are bounded by i64 milliseconds
    if i64::try_from(value).is_err() {
        return Err(ConfigError::InvalidExpiration(format!("too large: {value}")));
    }

    Ok(value)
}

fn parse_bcrypt_cost(raw: &str) -> Result<u32, ConfigError> {
    let cost: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBcryptCost(format!("not an integer: {raw}")))?;

    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(ConfigError::InvalidBcryptCost(format!(
            "{} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    Ok(cost)
}
