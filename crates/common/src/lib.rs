//! Common utilities shared across the bearer-auth crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for compact JWT structure checks and bearer header parsing
pub mod jwt;
