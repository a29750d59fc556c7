//! Integration tests for signup, login and the user endpoints

use auth_test_utils::{
    TestAuthServer, TokenAssertions, TEST_EMAIL_ALICE, TEST_EMAIL_BOB, TEST_FULL_NAME_ALICE,
    TEST_FULL_NAME_BOB, TEST_PASSWORD, TEST_WRONG_PASSWORD,
};
use reqwest::StatusCode;

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_returns_public_user() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response = server
        .signup(TEST_EMAIL_ALICE, TEST_PASSWORD, TEST_FULL_NAME_ALICE)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["email"], TEST_EMAIL_ALICE);
    assert_eq!(body["fullName"], TEST_FULL_NAME_ALICE);
    assert!(body["id"].as_i64().is_some());
    assert!(body["createdAt"].is_string());
    assert!(
        body.get("passwordHash").is_none() && body.get("password").is_none(),
        "Signup response must not carry credentials"
    );

    Ok(())
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server
        .signup(TEST_EMAIL_ALICE, TEST_PASSWORD, TEST_FULL_NAME_ALICE)
        .await?;

    let response = server
        .signup(TEST_EMAIL_ALICE, "another-password", "Impostor")
        .await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "EMAIL_ALREADY_REGISTERED");

    Ok(())
}

#[tokio::test]
async fn test_signup_validation_messages() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let too_long_email = format!("{}@example.com", "a".repeat(89));

    let cases = [
        ("", TEST_PASSWORD, "Alice", "Email is required"),
        ("not-an-email", TEST_PASSWORD, "Alice", "Email should be valid"),
        (TEST_EMAIL_ALICE, "", "Alice", "Password is required"),
        (TEST_EMAIL_ALICE, TEST_PASSWORD, "  ", "Full name is required"),
        (
            too_long_email.as_str(),
            TEST_PASSWORD,
            "Alice",
            "Email must be at most 100 characters",
        ),
    ];

    for (email, password, full_name, message) in cases {
        let response = server.signup(email, password, full_name).await?;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "case {message:?}"
        );
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"]["message"], message);
    }

    Ok(())
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_issues_token_for_email() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server
        .signup(TEST_EMAIL_ALICE, TEST_PASSWORD, TEST_FULL_NAME_ALICE)
        .await?;

    let response = server.login(TEST_EMAIL_ALICE, TEST_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["expiresIn"], 3_600_000);

    let token = body["token"].as_str().unwrap_or_default().to_string();
    token
        .assert_valid_jwt()
        .assert_for_subject(TEST_EMAIL_ALICE)
        .assert_lifetime_secs(3_600);

    Ok(())
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server
        .signup(TEST_EMAIL_ALICE, TEST_PASSWORD, TEST_FULL_NAME_ALICE)
        .await?;

    let wrong_password = server.login(TEST_EMAIL_ALICE, TEST_WRONG_PASSWORD).await?;
    let unknown_user = server.login(TEST_EMAIL_BOB, TEST_PASSWORD).await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let a: serde_json::Value = wrong_password.json().await?;
    let b: serde_json::Value = unknown_user.json().await?;
    assert_eq!(a, b, "Unknown email and wrong password must look the same");

    Ok(())
}

// ============================================================================
// User endpoints
// ============================================================================

#[tokio::test]
async fn test_me_returns_token_owner() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let alice = server
        .register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD)
        .await?;
    let bob = server
        .register_and_login(TEST_EMAIL_BOB, TEST_PASSWORD)
        .await?;

    let body: serde_json::Value = server.get_with_token("/users/me", &alice).await?.json().await?;
    assert_eq!(body["email"], TEST_EMAIL_ALICE);

    let body: serde_json::Value = server.get_with_token("/users/me", &bob).await?.json().await?;
    assert_eq!(body["email"], TEST_EMAIL_BOB);

    Ok(())
}

#[tokio::test]
async fn test_list_users_requires_token() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server
        .signup(TEST_EMAIL_ALICE, TEST_PASSWORD, TEST_FULL_NAME_ALICE)
        .await?;

    let anonymous = server.get("/users/").await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_list_users_returns_everyone() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server
        .signup(TEST_EMAIL_BOB, TEST_PASSWORD, TEST_FULL_NAME_BOB)
        .await?;
    let token = server
        .register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD)
        .await?;

    let response = server.get_with_token("/users/", &token).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Vec<serde_json::Value> = response.json().await?;
    let emails: Vec<_> = body.iter().filter_map(|u| u["email"].as_str()).collect();
    assert_eq!(emails, vec![TEST_EMAIL_BOB, TEST_EMAIL_ALICE]);

    Ok(())
}
