#![allow(dead_code)]

use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tokio::net::TcpListener;

use todo_api_rust::config::AppConfig;
use todo_api_rust::database::DatabaseManager;
use todo_api_rust::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123";

/// In-process server on an ephemeral port, backed by its own in-memory database
pub struct TestServer {
    pub base_url: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a user and return the issued token
    pub async fn register(&self, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?;

        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("register response has no token")
    }

    pub async fn create_todo(&self, token: &str, text: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/todos"))
            .bearer_auth(token)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        Ok(res.json().await?)
    }
}

/// Development preset with a fixed secret, the cheapest bcrypt cost and an in-memory database
pub fn test_config(rate_limited: bool) -> AppConfig {
    let mut config = AppConfig::development();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.database.url = "sqlite::memory:".to_string();
    config.api.enable_rate_limiting = rate_limited;
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.password_hash_cost = 4;
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(test_config(false)).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let pool = DatabaseManager::connect_and_migrate(&config.database).await?;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    let router = app(AppState::new(config, pool.clone()));
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .ok();
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        pool,
        client: reqwest::Client::new(),
    })
}
