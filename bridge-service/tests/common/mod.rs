#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use bridge_service::config::BridgeConfig;
use bridge_service::{build_router, AppState};
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";

pub const PROTECTED_ROUTES: &[&str] = &[
    "/chatwoot/conversations",
    "/chatwoot/messages/1",
    "/librechat/conversations",
    "/librechat/messages/65a1f0c2e4b0a1b2c3d4e5f6",
    "/librechat/users",
];

fn core_config() -> CoreConfig {
    CoreConfig {
        port: 0,
        log_level: "error".to_string(),
    }
}

pub fn config_from(pairs: &[(&str, &str)]) -> BridgeConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    BridgeConfig::from_lookup(core_config(), |key| vars.get(key).cloned())
        .expect("Failed to build test configuration")
}

/// Both stores point at a closed local port, so any store access fails fast.
pub fn unreachable_config() -> BridgeConfig {
    config_from(&[
        ("POSTGRES_HOST", "127.0.0.1"),
        ("POSTGRES_PORT", "1"),
        ("MONGO_HOST", "127.0.0.1"),
        ("MONGO_PORT", "1"),
        ("MONGO_SERVER_SELECTION_TIMEOUT_MS", "300"),
        ("MONGO_CONNECT_TIMEOUT_MS", "300"),
        ("BRIDGE_API_KEY", TEST_API_KEY),
    ])
}

/// Store settings for the integration tests that need live databases.
/// Defaults target a local PostgreSQL and MongoDB.
pub fn live_config(postgres_db: &str, mongo_db: &str, encoding: &str) -> BridgeConfig {
    dotenvy::dotenv().ok();
    let env = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

    let postgres_host = env("TEST_POSTGRES_HOST", "localhost");
    let postgres_port = env("TEST_POSTGRES_PORT", "5432");
    let postgres_user = env("TEST_POSTGRES_USER", "postgres");
    let postgres_password = env("TEST_POSTGRES_PASSWORD", "postgres");
    let mongo_host = env("TEST_MONGO_HOST", "localhost");
    let mongo_port = env("TEST_MONGO_PORT", "27017");

    config_from(&[
        ("POSTGRES_HOST", postgres_host.as_str()),
        ("POSTGRES_PORT", postgres_port.as_str()),
        ("POSTGRES_DB", postgres_db),
        ("POSTGRES_USER", postgres_user.as_str()),
        ("POSTGRES_PASSWORD", postgres_password.as_str()),
        ("MONGO_HOST", mongo_host.as_str()),
        ("MONGO_PORT", mongo_port.as_str()),
        ("MONGO_DB", mongo_db),
        ("MONGO_SERVER_SELECTION_TIMEOUT_MS", "2000"),
        ("BRIDGE_API_KEY", TEST_API_KEY),
        ("BRIDGE_DOCUMENT_ENCODING", encoding),
    ])
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.clone()).expect("Response body is not UTF-8")
    }
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            router: build_router(AppState::new(config)),
        }
    }

    pub fn unreachable() -> Self {
        Self::new(unreachable_config())
    }

    pub async fn get(&self, uri: &str, api_key: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(key) = api_key {
            builder = builder.header("X-API-Key", key);
        }
        let request = builder.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    pub async fn get_authorized(&self, uri: &str) -> TestResponse {
        self.get(uri, Some(TEST_API_KEY)).await
    }
}
