#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use blog_api_rust::authors::AuthorDirectory;
use blog_api_rust::posts::PostStore;
use blog_api_rust::router;
use blog_api_rust::seed;
use blog_api_rust::state::AppState;

pub const ADMIN_PASSWORD: &str = "admin-secret";

pub const CONTENT: &str = "Rust makes it possible to write fast and reliable software. \
    This post walks through ownership, borrowing and lifetimes with small examples.";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    async fn spawn(state: AppState) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let app = router::app(state);
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            port,
            base_url,
            client: Client::new(),
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in and return the bearer token
    pub async fn login(&self, author: &str, password: &str) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "author": author, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(resp.status().is_success(), "login failed for {}: {}", author, resp.status());

        let body: Value = resp.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).bearer_auth(token).json(&body).send().await?)
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self.client.put(self.url(path)).bearer_auth(token).json(&body).send().await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }
}

/// Empty store; Ann, Bob and admin can log in
pub async fn spawn_server() -> Result<TestServer> {
    let mut authors = AuthorDirectory::new();
    authors.register("Ann", "ann-secret")?;
    authors.register("Bob", "bob-secret")?;
    authors.register("admin", ADMIN_PASSWORD)?;

    TestServer::spawn(AppState::new(PostStore::new(), authors)).await
}

/// Store loaded from resources/blog_data.json, with the derived seed credentials
pub async fn spawn_seeded_server() -> Result<TestServer> {
    let data = seed::load_seed_file("resources/blog_data.json")?;
    let store = PostStore::new();
    let report = seed::seed_store(&store, &data).await;
    anyhow::ensure!(report.rejected.is_empty(), "seed posts rejected: {:?}", report.rejected);

    let authors = AuthorDirectory::seeded(data.authors(), ADMIN_PASSWORD);
    TestServer::spawn(AppState::new(store, authors)).await
}

pub fn post_body(title: &str) -> Value {
    json!({ "title": title, "content": CONTENT })
}
