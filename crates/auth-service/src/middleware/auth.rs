//! Per-request bearer authentication.
//!
//! Runs on every route. A request either leaves this layer with a
//! [`Principal`] in its extensions, leaves it anonymous, or is answered
//! directly by the [`AuthFailureResolver`] when the token cannot be processed.
//! Protected handlers take `Principal` as an extractor, which turns an
//! anonymous request into a 401.

use crate::auth::{TokenCodec, TokenValidator};
use crate::errors::AuthError;
use crate::observability::{hash_for_correlation, record_auth_decision};
use crate::repositories::{User, UserStore};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Method, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use common::jwt::bearer_token;
use std::sync::Arc;
use tracing::instrument;

/// Authenticated identity for the current request.
///
/// Lives in request extensions for one request and is never stored anywhere
/// else. No roles are modelled, so `authorities` is always empty.
#[derive(Debug, Clone)]
pub struct Principal {
    user: User,
    authorities: Vec<String>,
}

impl Principal {
    pub fn new(user: User) -> Self {
        Self {
            user,
            authorities: Vec::new(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Why a verified token did not produce a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Subject does not resolve to a stored user.
    IdentityNotFound,
    /// Stored user's username differs from the token subject.
    IdentityMismatch,
}

/// Outcome of authenticating one request.
#[derive(Debug)]
pub enum AuthDecision {
    /// No `Authorization: Bearer` header.
    Anonymous,
    /// A principal was already installed; the token was decoded but nothing
    /// else was done.
    AlreadyAuthenticated,
    Authenticated(Principal),
    /// Token verified but no principal installed. The request continues
    /// anonymously.
    Rejected(RejectReason),
}

impl AuthDecision {
    /// Bounded label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            AuthDecision::Anonymous => "anonymous",
            AuthDecision::AlreadyAuthenticated => "already_authenticated",
            AuthDecision::Authenticated(_) => "authenticated",
            AuthDecision::Rejected(_) => "rejected",
        }
    }
}

/// Turns a request's headers into an [`AuthDecision`].
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    validator: TokenValidator,
    users: Arc<dyn UserStore>,
}

impl RequestAuthenticator {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self {
            validator: TokenValidator::new(Arc::clone(&codec)),
            codec,
            users,
        }
    }

    /// Decide how the request is authenticated.
    ///
    /// The token is decoded even when `already_authenticated` is set, so a
    /// bad token is still reported as an error on a re-entered request.
    ///
    /// # Errors
    ///
    /// - `AuthError::Token` if the bearer token is malformed, forged, or expired
    /// - `AuthError::Database` if the identity lookup fails
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        already_authenticated: bool,
    ) -> Result<AuthDecision, AuthError> {
        let Some(token) = extract_bearer(headers) else {
            return Ok(AuthDecision::Anonymous);
        };

        let claims = self.codec.decode(token)?;

        if already_authenticated {
            return Ok(AuthDecision::AlreadyAuthenticated);
        }

        let Some(user) = self.users.lookup_identity(claims.subject()).await? else {
            tracing::debug!(
                target: "auth.middleware",
                subject_hash = %hash_for_correlation(claims.subject()),
                "Token subject does not resolve to a user"
            );
            return Ok(AuthDecision::Rejected(RejectReason::IdentityNotFound));
        };

        if !self.validator.is_valid_for(&claims, user.username()) {
            tracing::warn!(
                target: "auth.middleware",
                subject_hash = %hash_for_correlation(claims.subject()),
                user_id = user.id,
                "Token subject does not match resolved user"
            );
            return Ok(AuthDecision::Rejected(RejectReason::IdentityMismatch));
        }

        Ok(AuthDecision::Authenticated(Principal::new(user)))
    }
}

/// Raw token from `Authorization: Bearer <token>`.
///
/// A missing header, a non-UTF-8 value, or any other scheme means "no
/// token", not an error.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
}

/// Produces the response for a request whose token could not be processed.
pub trait AuthFailureResolver: Send + Sync {
    fn resolve(&self, method: &Method, uri: &Uri, error: AuthError) -> Response;
}

/// Resolves failures to the JSON error body of [`AuthError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFailureResolver;

impl AuthFailureResolver for JsonFailureResolver {
    fn resolve(&self, method: &Method, uri: &Uri, error: AuthError) -> Response {
        match &error {
            AuthError::Token(e) => tracing::debug!(
                target: "auth.middleware",
                method = %method,
                path = uri.path(),
                category = e.category(),
                "Rejecting request with unusable token"
            ),
            other => tracing::error!(
                target: "auth.middleware",
                method = %method,
                path = uri.path(),
                error = %other,
                "Authentication failed"
            ),
        }
        error.into_response()
    }
}

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<RequestAuthenticator>,
    pub resolver: Arc<dyn AuthFailureResolver>,
}

impl AuthState {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self {
            authenticator: Arc::new(RequestAuthenticator::new(codec, users)),
            resolver: Arc::new(JsonFailureResolver),
        }
    }
}

/// Authentication middleware.
///
/// # Response
///
/// - Continues with a `Principal` in extensions when the token is good
/// - Continues anonymously when there is no bearer token or the subject
///   does not resolve
/// - Returns the resolver's response, without calling the next layer, when
///   the token is malformed, forged, or expired or the lookup fails
#[instrument(skip_all, name = "auth.middleware.authenticate")]
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let already_authenticated = req.extensions().get::<Principal>().is_some();

    let decision = state
        .authenticator
        .authenticate(req.headers(), already_authenticated)
        .await;

    match decision {
        Ok(AuthDecision::Authenticated(principal)) => {
            record_auth_decision("authenticated");
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Ok(other) => {
            record_auth_decision(other.outcome());
            next.run(req).await
        }
        Err(error) => {
            record_auth_decision("error");
            state.resolver.resolve(req.method(), req.uri(), error)
        }
    }
}
