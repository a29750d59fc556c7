//! Fixed test identities for deterministic tests
//!
//! Using fixed emails and secrets prevents flaky tests caused by random data.

// Identities
pub const TEST_EMAIL_ALICE: &str = "alice@example.com";
pub const TEST_EMAIL_BOB: &str = "bob@example.com";
pub const TEST_EMAIL_UNKNOWN: &str = "nobody@example.com";

pub const TEST_FULL_NAME_ALICE: &str = "Alice Example";
pub const TEST_FULL_NAME_BOB: &str = "Bob Example";

// Test passwords (for registration)
pub const TEST_PASSWORD: &str = "test-password-do-not-use-in-production";
pub const TEST_WRONG_PASSWORD: &str = "not-the-password";

// Signing secret seeds
pub const TEST_KEY_SEED_PRIMARY: u8 = 1;
pub const TEST_KEY_SEED_OTHER: u8 = 2;

/// Token lifetime used by the test server (1 hour), in milliseconds.
pub const TEST_TOKEN_LIFETIME_MS: u64 = 3_600_000;
