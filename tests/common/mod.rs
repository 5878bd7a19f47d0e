#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use pro_tasker_api::config::AppConfig;
use pro_tasker_api::database::MemoryStore;
use pro_tasker_api::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

/// An API server running inside the test's runtime on its own port and store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::new("memory://", JWT_SECRET);
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        // Lowest cost bcrypt accepts; keeps the suite fast
        config.security.bcrypt_cost = 4;

        let listener = tokio::net::TcpListener::bind(config.bind_addr())
            .await
            .context("failed to bind test port")?;
        let state = AppState::new(config, Arc::new(MemoryStore::new()))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, pro_tasker_api::app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            client: Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str, body: Value) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token).json(&body)
    }

    pub fn put(&self, path: &str, token: &str, body: Value) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token).json(&body)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register an account and return its token.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        let (status, body) = read(res).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);
        token_of(&body)
    }

    /// Create a project and return its JSON.
    pub async fn create_project(&self, token: &str, body: Value) -> Result<Value> {
        let (status, body) = read(self.post("/api/projects", token, body).send().await?).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create project failed: {} {}", status, body);
        Ok(body)
    }

    /// Create a task under `project_id` and return its JSON.
    pub async fn create_task(&self, token: &str, project_id: &str, body: Value) -> Result<Value> {
        let path = format!("/api/projects/{}/tasks", project_id);
        let (status, body) = read(self.post(&path, token, body).send().await?).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create task failed: {} {}", status, body);
        Ok(body)
    }
}

/// Status and JSON body of a response
pub async fn read(res: Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let body = res.json::<Value>().await.context("response body was not JSON")?;
    Ok((status, body))
}

pub fn token_of(body: &Value) -> Result<String> {
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("response has no token")
}

pub fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap_or_default().to_string()
}
