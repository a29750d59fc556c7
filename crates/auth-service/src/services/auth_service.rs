//! Signup and credential verification.

use crate::crypto;
use crate::errors::AuthError;
use crate::models::{LoginUserRequest, RegisterUserRequest};
use crate::observability::hash_for_correlation;
use crate::repositories::{NewUser, User, UserStore};
use common::secret::ExposeSecret;
use tracing::instrument;

/// Width of the `users.email` column.
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Register a new user.
///
/// # Steps
///
/// 1. Require email, password and full name to be non-blank
/// 2. Validate email format and length
/// 3. Hash password (bcrypt, configured cost)
/// 4. Insert user; a taken email fails with `EmailAlreadyRegistered`
#[instrument(skip_all, name = "auth.signup")]
pub async fn signup(
    users: &dyn UserStore,
    bcrypt_cost: u32,
    request: RegisterUserRequest,
) -> Result<User, AuthError> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    if !is_valid_email(email) {
        return Err(AuthError::Validation("Email should be valid".to_string()));
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(AuthError::Validation(format!(
            "Email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }

    let password = match &request.password {
        Some(p) if !p.expose_secret().trim().is_empty() => p,
        _ => return Err(AuthError::Validation("Password is required".to_string())),
    };

    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return Err(AuthError::Validation("Full name is required".to_string()));
    }

    let password_hash = crypto::hash_password(password.expose_secret(), bcrypt_cost)?;

    let user = users
        .save(NewUser {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;

    tracing::info!(
        target: "auth.services.signup",
        user_id = user.id,
        email_hash = %hash_for_correlation(&user.email),
        "User registered"
    );

    Ok(user)
}

/// Verify login credentials and return the matching user.
///
/// Unknown email and wrong password both yield `InvalidCredentials`, and both
/// pay for one bcrypt verification.
#[instrument(skip_all, name = "auth.login")]
pub async fn authenticate(
    users: &dyn UserStore,
    dummy_hash: &str,
    request: &LoginUserRequest,
) -> Result<User, AuthError> {
    let user = users.lookup_identity(&request.email).await?;

    let Some(user) = user else {
        crypto::verify_dummy_password(request.password.expose_secret(), dummy_hash);
        tracing::warn!(
            target: "auth.services.login",
            email_hash = %hash_for_correlation(&request.email),
            "Login failed"
        );
        return Err(AuthError::InvalidCredentials);
    };

    if !crypto::verify_password(request.password.expose_secret(), &user.password_hash)? {
        tracing::warn!(
            target: "auth.services.login",
            email_hash = %hash_for_correlation(&request.email),
            "Login failed"
        );
        return Err(AuthError::InvalidCredentials);
    }

    tracing::info!(target: "auth.services.login", user_id = user.id, "User authenticated");
    Ok(user)
}

/// Basic email shape check: `local@domain.tld` with no empty parts.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut labels = domain.split('.');
    let first_ok = labels.next().is_some_and(|l| !l.is_empty());
    let mut rest = labels.peekable();
    first_ok && rest.peek().is_some() && rest.all(|l| !l.is_empty())
}
