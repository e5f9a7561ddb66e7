//! Shared test helpers for API tests.
//!
//! Every `TestApp` runs the full router over an in-memory entity store and a
//! temporary content directory, authenticating with tokens signed by the
//! same secret the decoder verifies.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use stowage_api::{AppState, build_app};
use stowage_auth::{JwtDecoder, JwtEncoder};
use stowage_core::config::{AppConfig, StoreBackend};
use stowage_database::MemoryEntityStore;
use stowage_storage::LocalStorageProvider;

const BOUNDARY: &str = "stowage-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.server.public_base_url = "https://stowage.test".to_string();
        config.storage.root_path = dir.path().to_string_lossy().into_owned();

        let storage = LocalStorageProvider::new(&config.storage.root_path)
            .await
            .expect("Failed to init storage");

        let state = AppState::new(
            config.clone(),
            Arc::new(MemoryEntityStore::new()),
            Arc::new(storage),
            Arc::new(JwtDecoder::new(&config.auth)),
        );

        Self {
            router: build_app(state),
            encoder: JwtEncoder::new(&config.auth),
            config,
            _dir: dir,
        }
    }

    /// Mint a bearer token for an identity-provider subject.
    pub fn token_for(&self, external_id: &str) -> String {
        self.encoder
            .issue(external_id, None, None, chrono::Duration::minutes(10))
            .expect("Failed to issue token")
    }

    /// Register a user and return a token for them.
    pub async fn register(&self, name: &str, external_id: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/users/register",
                Some(json!({
                    "name": name,
                    "email": format!("{name}@example.com"),
                    "external_id": external_id,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        self.token_for(external_id)
    }

    /// Create a folder and return its id.
    pub async fn create_folder(&self, token: &str, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name, "parent": parent })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Upload a file through the multipart endpoint and return its id.
    pub async fn upload(
        &self,
        token: &str,
        name: &str,
        folder_id: Option<&str>,
        content: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        if let Some(folder_id) = folder_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"folder_id\"\r\n\r\n{folder_id}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Make a JSON request against the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let raw = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body: Value = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Parsed JSON body (`Null` when not JSON)
    pub body: Value,
    /// Raw body bytes
    pub raw: Bytes,
}

impl TestResponse {
    /// `data.id` of a success envelope.
    pub fn id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .expect("response has no data.id")
            .to_string()
    }

    /// Names in a `data` array, in response order.
    pub fn names(&self) -> Vec<String> {
        names_of(&self.body["data"])
    }
}

/// Names in a JSON array of entities, in order.
pub fn names_of(items: &Value) -> Vec<String> {
    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
