//! Integration tests for per-request bearer authentication
//!
//! Every route sits behind the authentication middleware. A request with no
//! usable bearer token proceeds anonymously; a token that is present but
//! malformed, forged or expired stops the request with an error, even on
//! public routes.

use auth_test_utils::{
    TestAuthServer, TestTokenBuilder, TEST_EMAIL_ALICE, TEST_EMAIL_UNKNOWN, TEST_KEY_SEED_OTHER,
    TEST_PASSWORD,
};
use jsonwebtoken::Algorithm;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;

async fn get_with_header(
    server: &TestAuthServer,
    path: &str,
    authorization: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    let response = reqwest::Client::new()
        .get(format!("{}{}", server.url(), path))
        .header(AUTHORIZATION, authorization)
        .send()
        .await?;
    Ok(response)
}

async fn error_code(response: reqwest::Response) -> Result<String, anyhow::Error> {
    let body: serde_json::Value = response.json().await?;
    Ok(body["error"]["code"].as_str().unwrap_or_default().to_string())
}

// ============================================================================
// Accepted tokens
// ============================================================================

/// A token minted by any HS256 issuer holding the same secret is accepted
#[tokio::test]
async fn test_externally_minted_token_is_accepted() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server.signup(TEST_EMAIL_ALICE, TEST_PASSWORD, "Alice").await?;

    let token = TestTokenBuilder::new()
        .for_user(TEST_EMAIL_ALICE)
        .with_claim("tenant", "blue")
        .build();

    let response = server.get_with_token("/users/me", &token).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["email"], TEST_EMAIL_ALICE);
    Ok(())
}

// ============================================================================
// Anonymous requests
// ============================================================================

#[tokio::test]
async fn test_missing_or_foreign_scheme_is_anonymous() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server
        .register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD)
        .await?;

    for header in [
        format!("Basic {token}"),
        format!("bearer {token}"),
        format!("Token {token}"),
        token.clone(),
    ] {
        let public = get_with_header(&server, "/health", &header).await?;
        assert_eq!(public.status(), StatusCode::OK, "header {header:?}");

        let protected = get_with_header(&server, "/users/me", &header).await?;
        assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(protected).await?, "AUTHENTICATION_REQUIRED");
    }

    Ok(())
}

/// A verified token whose subject has no account carries no principal
#[tokio::test]
async fn test_token_for_unknown_subject_is_anonymous() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = TestTokenBuilder::new().for_user(TEST_EMAIL_UNKNOWN).build();

    let public = server.get_with_token("/health", &token).await?;
    assert_eq!(public.status(), StatusCode::OK);

    let protected = server.get_with_token("/users/me", &token).await?;
    assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(protected).await?, "AUTHENTICATION_REQUIRED");

    Ok(())
}

/// Subjects are matched exactly; a differently-cased email is another user
#[tokio::test]
async fn test_subject_match_is_case_sensitive() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server.signup(TEST_EMAIL_ALICE, TEST_PASSWORD, "Alice").await?;

    let token = TestTokenBuilder::new()
        .for_user(&TEST_EMAIL_ALICE.to_uppercase())
        .build();

    let response = server.get_with_token("/users/me", &token).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

// ============================================================================
// Rejected tokens
// ============================================================================

#[tokio::test]
async fn test_token_signed_with_other_key_is_forbidden() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server.signup(TEST_EMAIL_ALICE, TEST_PASSWORD, "Alice").await?;

    let forged = TestTokenBuilder::new()
        .for_user(TEST_EMAIL_ALICE)
        .signed_with_seed(TEST_KEY_SEED_OTHER)
        .build();

    let response = server.get_with_token("/users/me", &forged).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await?, "INVALID_SIGNATURE");

    Ok(())
}

#[tokio::test]
async fn test_other_hmac_algorithm_is_forbidden() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server.signup(TEST_EMAIL_ALICE, TEST_PASSWORD, "Alice").await?;

    let token = TestTokenBuilder::new()
        .for_user(TEST_EMAIL_ALICE)
        .with_algorithm(Algorithm::HS512)
        .build();

    let response = server.get_with_token("/users/me", &token).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await?, "INVALID_SIGNATURE");

    Ok(())
}

#[tokio::test]
async fn test_tampered_payload_is_forbidden() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server
        .register_and_login(TEST_EMAIL_ALICE, TEST_PASSWORD)
        .await?;

    // Re-sign nothing; swap in a payload naming another user.
    let other_payload = TestTokenBuilder::new().for_user("mallory@example.com").build();
    let forged_payload = other_payload.split('.').nth(1).unwrap_or_default();
    let mut segments = token.split('.');
    let header = segments.next().unwrap_or_default();
    let signature = segments.nth(1).unwrap_or_default();
    let forged = format!("{header}.{forged_payload}.{signature}");

    let response = server.get_with_token("/users/me", &forged).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await?, "INVALID_SIGNATURE");

    Ok(())
}

#[tokio::test]
async fn test_malformed_token_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let no_subject = TestTokenBuilder::new().without_subject().build();

    for token in ["garbage", "a.b", "a.b.c", "a..c", no_subject.as_str()] {
        let response = server.get_with_token("/users/me", token).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "token {token:?}");
        assert_eq!(error_code(response).await?, "INVALID_TOKEN");
    }

    Ok(())
}

/// A bad token fails the request even where no principal is needed
#[tokio::test]
async fn test_bad_token_fails_public_routes() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response = server.get_with_token("/health", "not-a-token").await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = TestTokenBuilder::new()
        .signed_with_seed(TEST_KEY_SEED_OTHER)
        .build();
    let response = reqwest::Client::new()
        .post(format!("{}/auth/login", server.url()))
        .bearer_auth(&forged)
        .json(&serde_json::json!({"email": TEST_EMAIL_ALICE, "password": TEST_PASSWORD}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}
