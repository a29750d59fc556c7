//! Test server harness for E2E testing
//!
//! Provides TestAuthServer for spawning real auth server instances in tests.

use crate::crypto_fixtures::test_secret_base64;
use crate::test_ids::{TEST_KEY_SEED_PRIMARY, TEST_TOKEN_LIFETIME_MS};
use auth_service::auth::{ManualClock, TokenCodec};
use auth_service::config::{Config, MIN_BCRYPT_COST};
use auth_service::models::LoginResponse;
use auth_service::observability::init_metrics_recorder;
use auth_service::repositories::{InMemoryUserStore, UserStore};
use auth_service::routes::{self, AppState};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the auth server in E2E tests
///
/// The server keeps users in memory and reads time from a [`ManualClock`],
/// so tests can move past token expiry without sleeping.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_e2e() -> Result<()> {
///     let server = TestAuthServer::spawn().await?;
///     let token = server.register_and_login("alice@example.com", "pw").await?;
///
///     server.clock().advance(chrono::Duration::hours(2));
///     let response = server.get_with_token("/users/me", &token).await?;
///     assert_eq!(response.status(), 403);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    config: Config,
    users: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
    clock: Arc<ManualClock>,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a new test server instance with an empty in-memory user store
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(InMemoryUserStore::new())).await
    }

    /// Spawn a test server backed by `users`
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign with the primary test secret
    /// - Hash passwords at the minimum bcrypt cost
    /// - Start the HTTP server in the background
    pub async fn spawn_with_store(users: Arc<dyn UserStore>) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            (
                "JWT_SECRET_KEY".to_string(),
                test_secret_base64(TEST_KEY_SEED_PRIMARY),
            ),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("BCRYPT_COST".to_string(), MIN_BCRYPT_COST.to_string()),
            (
                "JWT_EXPIRATION_MS".to_string(),
                TEST_TOKEN_LIFETIME_MS.to_string(),
            ),
        ]);
        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to build test config: {}", e))?;

        let clock = Arc::new(ManualClock::starting_now());
        let codec = Arc::new(TokenCodec::with_clock(
            config.signing_key.clone(),
            clock.clone(),
        ));

        let state = Arc::new(
            AppState::new(users.clone(), codec.clone(), config.clone())
                .map_err(|e| anyhow::anyhow!("Failed to build app state: {}", e))?,
        );

        // The global recorder can only be installed once per process; later
        // servers get a standalone recorder.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            users,
            codec,
            clock,
            client: reqwest::Client::new(),
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The store the server reads users from
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// The codec the server signs and verifies with
    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// The server's clock
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// POST /auth/signup
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/auth/signup", self.url()))
            .json(&json!({"email": email, "password": password, "fullName": full_name}))
            .send()
            .await?;
        Ok(response)
    }

    /// POST /auth/login
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.url()))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await?;
        Ok(response)
    }

    /// Sign up a user and return a fresh login token
    pub async fn register_and_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, anyhow::Error> {
        let signup = self.signup(email, password, "Test User").await?;
        anyhow::ensure!(
            signup.status().is_success(),
            "Signup failed with status {}",
            signup.status()
        );

        let login = self.login(email, password).await?;
        anyhow::ensure!(
            login.status().is_success(),
            "Login failed with status {}",
            login.status()
        );

        let body: LoginResponse = login.json().await?;
        Ok(body.token)
    }

    /// GET `path` with `Authorization: Bearer <token>`
    pub async fn get_with_token(
        &self,
        path: &str,
        token: &str,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let response = self
            .client
            .get(format!("{}{}", self.url(), path))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }

    /// GET `path` with no credentials
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, anyhow::Error> {
        let response = self
            .client
            .get(format!("{}{}", self.url(), path))
            .send()
            .await?;
        Ok(response)
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
