#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use payment_api::app::{app, AppState};
use payment_api::config::AppConfig;
use payment_api::database::Store;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_EMAIL: &str = "tester@example.com";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    // Cheapest cost bcrypt accepts, keeps registration fast
    config.security.bcrypt_cost = 4;
    config.api.enable_request_logging = false;
    config
}

/// Router over a fresh in-memory store, driven with `oneshot`
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            router: app(AppState::new(Store::memory(), config)),
        }
    }

    /// Send a request with an optional bearer token and raw body; returns status and JSON body
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(body.map(Body::from).unwrap_or_else(Body::empty))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("response is not JSON: {}", String::from_utf8_lossy(&bytes))
            })?
        };
        Ok((status, value))
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, Some(token), Some(body.to_string())).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, Some(token), Some(body.to_string())).await
    }

    /// PUT without a body, for the activation toggles
    pub async fn put_empty(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, Some(token), None).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, path, Some(token), Some(body.to_string())).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, Some(token), None).await
    }

    /// Public endpoint helper: POST without a token
    pub async fn post_public(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, None, Some(body.to_string())).await
    }

    /// Register the default test user and log in
    pub async fn token(&self) -> Result<String> {
        let credentials = json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD });

        let (status, body) = self.post_public("/register", credentials.clone()).await?;
        anyhow::ensure!(status == StatusCode::OK, "register failed: {} {}", status, body);

        let (status, body) = self.post_public("/login", credentials).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }
}

/// The compiled binary on a free port, killed on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_payment-api"));
        cmd.arg("serve")
            .env("PAYMENT_API_PORT", port.to_string())
            .env("HOST", "127.0.0.1")
            .env("JWT_SECRET", TEST_SECRET)
            .env("SECURITY_BCRYPT_COST", "4")
            .env("DATABASE_URL", "")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    /// Poll until the listener accepts connections; any HTTP answer counts
    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if client.get(format!("{}/health", self.base_url)).send().await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
