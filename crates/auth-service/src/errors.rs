use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures of the token codec.
///
/// Display strings are for logs only; clients see the generic messages from
/// [`AuthError::into_response`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Recomputed signature does not match (forged, tampered, or other key).
    #[error("token signature is invalid")]
    Signature,

    /// Not a three-segment token, or claims are not a valid mapping.
    #[error("token is malformed")]
    Malformed,

    /// Signature is valid but `exp` is at or before the current time.
    #[error("token has expired")]
    Expired,

    /// Claims could not be serialized.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Bounded label for metrics and logs.
    pub fn category(&self) -> &'static str {
        match self {
            TokenError::Signature => "signature",
            TokenError::Malformed => "malformed",
            TokenError::Expired => "expired",
            TokenError::Encoding(_) => "encoding",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl AuthError {
    fn status_code_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AuthError::Token(TokenError::Signature) => (
                StatusCode::FORBIDDEN,
                "INVALID_SIGNATURE",
                "The JWT signature is invalid.".to_string(),
            ),
            AuthError::Token(TokenError::Expired) => (
                StatusCode::FORBIDDEN,
                "TOKEN_EXPIRED",
                "The JWT token has expired.".to_string(),
            ),
            AuthError::Token(TokenError::Malformed) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "The access token is invalid.".to_string(),
            ),
            AuthError::Token(TokenError::Encoding(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "The username or password is incorrect.".to_string(),
            ),
            AuthError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_REQUIRED",
                "Full authentication is required to access this resource.".to_string(),
            ),
            AuthError::Validation(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", reason.clone())
            }
            AuthError::EmailAlreadyRegistered => (
                StatusCode::CONFLICT,
                "EMAIL_ALREADY_REGISTERED",
                "An account with this email already exists".to_string(),
            ),
            AuthError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An internal database error occurred".to_string(),
            ),
            AuthError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CRYPTO_ERROR",
                "An internal cryptographic error occurred".to_string(),
            ),
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_message();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
