//! HTTP routes for the auth service.
//!
//! Defines the Axum router and application state.

use crate::auth::TokenCodec;
use crate::config::Config;
use crate::crypto;
use crate::errors::AuthError;
use crate::handlers;
use crate::middleware::{authenticate, http_metrics_middleware, AuthState};
use crate::repositories::UserStore;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    /// Token codec built once from the configured signing key.
    pub codec: Arc<TokenCodec>,
    pub config: Config,
    /// bcrypt hash at the configured cost, verified for unknown emails.
    pub dummy_password_hash: String,
}

impl AppState {
    /// Builds the state, hashing the dummy password at `config.bcrypt_cost`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Crypto` if bcrypt fails.
    pub fn new(
        users: Arc<dyn UserStore>,
        codec: Arc<TokenCodec>,
        config: Config,
    ) -> Result<Self, AuthError> {
        let dummy_password_hash = crypto::dummy_password_hash(config.bcrypt_cost)?;
        Ok(Self {
            users,
            codec,
            config,
            dummy_password_hash,
        })
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (simple "OK")
/// - `/metrics` - Prometheus metrics endpoint
/// - `/auth/signup`, `/auth/login` - public
/// - `/users/me`, `/users/` - require a principal
///
/// Every request passes through bearer authentication. Public routes simply
/// ignore the principal; protected handlers extract it.
///
/// Layer order (outermost first): HTTP metrics, CORS, trace, 30 second
/// timeout, authentication.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = AuthState::new(state.codec.clone(), state.users.clone());

    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let protected_routes = Router::new()
        .route("/users/me", get(handlers::authenticated_user))
        .route("/users", get(handlers::all_users))
        .route("/users/", get(handlers::all_users))
        .with_state(state);

    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(auth_state, authenticate))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(http_metrics_middleware))
}
