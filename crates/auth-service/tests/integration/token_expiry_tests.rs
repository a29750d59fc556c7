//! End-to-end token expiry against the server's manual clock

use auth_test_utils::{TestAuthServer, TEST_EMAIL_ALICE, TEST_PASSWORD};
use chrono::Duration;
use reqwest::StatusCode;

/// Issue for alice with a one hour lifetime, use it, then move the clock
/// 3600001ms forward and use it again.
#[tokio::test]
async fn test_token_valid_then_expired() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAuthServer::spawn().await?;
    let token = server
        .register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD)
        .await?;

    // Act / Assert - valid immediately, principal is alice
    let response = server.get_with_token("/users/me", &token).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["email"], TEST_EMAIL_ALICE);

    // Act / Assert - expired after the lifetime plus one millisecond
    server.clock().advance(Duration::milliseconds(3_600_001));

    let response = server.get_with_token("/users/me", &token).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");

    Ok(())
}

#[tokio::test]
async fn test_token_still_valid_just_before_expiry() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server
        .register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD)
        .await?;

    // exp is truncated to whole seconds, so the real lifetime is between
    // 3599.001s and 3600s.
    server.clock().advance(Duration::milliseconds(3_599_000));

    let response = server.get_with_token("/users/me", &token).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// After expiry a fresh login yields a working token again
#[tokio::test]
async fn test_relogin_after_expiry() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let old = server
        .register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD)
        .await?;

    server.clock().advance(Duration::hours(2));

    let login = server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;
    assert_eq!(login.status(), StatusCode::OK);
    let body: serde_json::Value = login.json().await?;
    let fresh = body["token"].as_str().unwrap_or_default().to_string();

    assert_eq!(
        server.get_with_token("/users/me", &old).await?.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        server.get_with_token("/users/me", &fresh).await?.status(),
        StatusCode::OK
    );

    Ok(())
}
