use crate::auth::{ExtraClaims, TokenCodec};
use crate::errors::AuthError;
use crate::models::LoginResponse;
use crate::observability::{hash_for_correlation, record_token_issuance};
use crate::repositories::User;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Issue a login token for an authenticated user.
///
/// The subject is the user's canonical username (email). `expiresIn` in the
/// response is the configured lifetime in milliseconds.
#[instrument(skip_all, name = "auth.token.issue")]
pub fn issue_login_token(
    codec: &TokenCodec,
    user: &User,
    expires_in: Duration,
) -> Result<LoginResponse, AuthError> {
    let start = Instant::now();

    let result = codec.issue(user.username(), ExtraClaims::new(), expires_in);
    let status = if result.is_ok() { "success" } else { "error" };
    record_token_issuance(status, start.elapsed());

    let token = result.map_err(|e| {
        tracing::error!(target: "auth.services.token", error = %e, "Token issuance failed");
        AuthError::from(e)
    })?;

    tracing::debug!(
        target: "auth.services.token",
        subject_hash = %hash_for_correlation(user.username()),
        "Token issued"
    );

    Ok(LoginResponse {
        token,
        expires_in: u64::try_from(expires_in.as_millis()).map_err(|_| AuthError::Internal)?,
    })
}
