//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use them for the
//! token signing secret, derived key material, and user passwords as they
//! move through request handling.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so a
//! struct that derives `Debug` while holding one of them is safe to log via
//! `{:?}` or `tracing`. Values are zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct LoginAttempt {
//!     email: String,
//!     password: SecretString,
//! }
//!
//! let attempt = LoginAttempt {
//!     email: "alice@example.com".to_string(),
//!     password: SecretString::from("hunter2"),
//! };
//!
//! assert!(!format!("{attempt:?}").contains("hunter2"));
//! assert_eq!(attempt.password.expose_secret(), "hunter2");
//! ```
//!
//! # Usage
//!
//! - `SecretString`: passwords in signup and login request bodies
//! - `SecretBox<Vec<u8>>`: decoded HMAC key bytes

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
