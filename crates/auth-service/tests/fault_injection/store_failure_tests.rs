//! Fault injection tests for user store failures
//!
//! Uses a store whose every call fails with a database error.

use auth_service::repositories::users::mock::FailingUserStore;
use auth_service::repositories::UserStore;
use auth_test_utils::{TestAuthServer, TestTokenBuilder, TEST_EMAIL_ALICE, TEST_PASSWORD};
use reqwest::StatusCode;
use std::sync::Arc;

async fn spawn_failing() -> Result<(TestAuthServer, Arc<FailingUserStore>), anyhow::Error> {
    let store = Arc::new(FailingUserStore::new());
    let users: Arc<dyn UserStore> = store.clone();
    let server = TestAuthServer::spawn_with_store(users).await?;
    Ok((server, store))
}

/// Login against a dead store is a generic 500 that leaks nothing
#[tokio::test]
async fn test_login_returns_500_when_store_unavailable() -> Result<(), anyhow::Error> {
    let (server, _) = spawn_failing().await?;

    let response = server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await?;
    assert!(body.contains("DATABASE_ERROR"));
    assert!(
        !body.contains("connection refused"),
        "Error body must not leak store details: {body}"
    );

    Ok(())
}

#[tokio::test]
async fn test_signup_returns_500_when_store_unavailable() -> Result<(), anyhow::Error> {
    let (server, _) = spawn_failing().await?;

    let response = server.signup(TEST_EMAIL_ALICE, TEST_PASSWORD, "Alice").await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

/// A verified token needs the store; its failure stops the request
#[tokio::test]
async fn test_identity_lookup_failure_stops_request() -> Result<(), anyhow::Error> {
    let (server, store) = spawn_failing().await?;
    let token = TestTokenBuilder::new().for_user(TEST_EMAIL_ALICE).build();

    let response = server.get_with_token("/health", &token).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.call_count(), 1);
    Ok(())
}

/// Anonymous and rejected-token requests never reach the store
#[tokio::test]
async fn test_store_untouched_without_verified_token() -> Result<(), anyhow::Error> {
    let (server, store) = spawn_failing().await?;

    let anonymous = server.get("/health").await?;
    assert_eq!(anonymous.status(), StatusCode::OK);

    let malformed = server.get_with_token("/health", "garbage").await?;
    assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(store.call_count(), 0);
    Ok(())
}
