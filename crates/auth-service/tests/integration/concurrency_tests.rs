//! Concurrent requests against one server

use auth_service::auth::ExtraClaims;
use auth_test_utils::{TestAuthServer, TEST_PASSWORD};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Many users hitting `/users/me` at once each see only themselves
#[tokio::test]
async fn test_concurrent_requests_resolve_own_principal() -> Result<(), anyhow::Error> {
    let server = Arc::new(TestAuthServer::spawn().await?);

    let mut tokens = Vec::new();
    for i in 0..10 {
        let email = format!("user{i}@example.com");
        let token = server.register_and_login(&email, TEST_PASSWORD).await?;
        tokens.push((email, token));
    }

    let mut tasks = JoinSet::new();
    for round in 0..10 {
        for (email, token) in &tokens {
            let server = Arc::clone(&server);
            let email = email.clone();
            let token = token.clone();
            tasks.spawn(async move {
                let response = server.get_with_token("/users/me", &token).await?;
                anyhow::ensure!(
                    response.status() == StatusCode::OK,
                    "round {round}: status {}",
                    response.status()
                );
                let body: serde_json::Value = response.json().await?;
                anyhow::ensure!(body["email"] == email.as_str(), "round {round}: wrong user");
                Ok::<(), anyhow::Error>(())
            });
        }
    }

    let mut completed = 0;
    while let Some(result) = tasks.join_next().await {
        result??;
        completed += 1;
    }
    assert_eq!(completed, 100);

    Ok(())
}

/// 1000 concurrent issue/decode pairs on the server's codec
#[tokio::test]
async fn test_concurrent_codec_use_has_no_cross_talk() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let codec = Arc::clone(server.codec());

    let mut tasks = JoinSet::new();
    for i in 0..1000i64 {
        let codec = Arc::clone(&codec);
        tasks.spawn(async move {
            let subject = format!("user{i}@example.com");
            let mut extra = ExtraClaims::new();
            extra.insert("n".to_string(), i.into());

            let token = codec.issue(&subject, extra, Duration::from_secs(60))?;
            let claims = codec.decode(&token)?;

            anyhow::ensure!(claims.subject() == subject, "subject mixed up for {i}");
            anyhow::ensure!(
                claims.extra("n").and_then(|v| v.as_i64()) == Some(i),
                "extra claim mixed up for {i}"
            );
            Ok::<(), anyhow::Error>(())
        });
    }

    while let Some(result) = tasks.join_next().await {
        result??;
    }

    Ok(())
}
