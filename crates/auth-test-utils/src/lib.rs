//! # Auth Test Utilities
//!
//! Shared test utilities for the bearer token auth service.
//!
//! This crate provides:
//! - Deterministic signing secrets (fixed keys for reproducible tests)
//! - Test data builders (TestTokenBuilder)
//! - Server test harness (TestAuthServer for E2E tests)
//! - Fixed test identities
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let server = TestAuthServer::spawn().await?;
//!     let token = server.register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;
//!
//!     token.assert_valid_jwt()
//!          .assert_for_subject(TEST_EMAIL_ALICE);
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;

// Tests drive server time through this clock
pub use auth_service::auth::ManualClock;
