//! Mock vault for testing.
//!
//! Wraps a wiremock [`MockServer`] with mounts for each vault route. Every
//! mount requires the bearer token from [`crate::fixtures::TOKEN`], so a
//! client that forgets its headers gets wiremock's default 404.

use crate::fixtures::TOKEN;
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock Sirr vault.
pub struct MockVault {
    server: MockServer,
}

impl MockVault {
    /// Start a new mock vault on a random port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mock.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server, for request inspection.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    async fn mount(&self, verb: &str, route: &str, status: u16, body: Option<Value>) {
        let mut response = ResponseTemplate::new(status);
        if let Some(body) = body {
            response = response.set_body_json(body);
        }
        Mock::given(method(verb))
            .and(path(route))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /secrets` with `body`.
    pub async fn mount_list(&self, body: Value) {
        self.mount("GET", "/secrets", 200, Some(body)).await;
    }

    /// Answer `GET {route}` (already percent-encoded) with `status` and `body`.
    pub async fn mount_get(&self, route: &str, status: u16, body: Value) {
        self.mount("GET", route, status, Some(body)).await;
    }

    /// Answer `POST /secrets` with `status` and `body`.
    pub async fn mount_push(&self, status: u16, body: Value) {
        self.mount("POST", "/secrets", status, Some(body)).await;
    }

    /// Answer `DELETE {route}` with `status` and `body`.
    pub async fn mount_delete(&self, route: &str, status: u16, body: Value) {
        self.mount("DELETE", route, status, Some(body)).await;
    }

    /// Answer `POST /prune` with `status` and `body`.
    pub async fn mount_prune(&self, status: u16, body: Value) {
        self.mount("POST", "/prune", status, Some(body)).await;
    }

    /// Answer `GET /health` with `status` and `body`.
    pub async fn mount_health(&self, status: u16, body: Value) {
        self.mount("GET", "/health", status, Some(body)).await;
    }

    /// Answer `verb route` with `status` and a raw text body.
    pub async fn mount_raw(&self, verb: &str, route: &str, status: u16, body: &str) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far, parsed as JSON.
    pub async fn received_json_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// Raw paths of every request received so far, in arrival order.
    pub async fn received_paths(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.url.path().to_string())
            .collect()
    }
}
