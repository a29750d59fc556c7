//! Middleware for the auth service.
//!
//! # Components
//!
//! - `auth` - Bearer token authentication, installs the request `Principal`
//! - `http_metrics` - HTTP request metrics

pub mod auth;
pub mod http_metrics;

pub use auth::{
    authenticate, AuthDecision, AuthFailureResolver, AuthState, JsonFailureResolver, Principal,
    RejectReason, RequestAuthenticator,
};
pub use http_metrics::http_metrics_middleware;
