//! Bearer Token Authentication Service Library
//!
//! Username/password authentication that issues and verifies HMAC-SHA256
//! signed bearer tokens for a web API.
//!
//! # Modules
//!
//! - `auth` - Token codec, claims, validator and clock
//! - `config` - Service configuration
//! - `crypto` - Signing key derivation and password hashing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Per-request bearer authentication
//! - `models` - Request/response payloads
//! - `observability` - Metrics and log correlation hashing
//! - `repositories` - User store
//! - `routes` - Router assembly
//! - `services` - Signup, login and user listing

pub mod auth;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
