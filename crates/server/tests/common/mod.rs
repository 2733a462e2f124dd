//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by a temporary record store, a seed document and a mock image
//! fetcher, so the HTTP API can be exercised without network access.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use catapi_core::{
    create_authenticator, load_config_from_str, open_store, testing::MockImageFetcher,
    Authenticator, CatStore, CatalogService, CatService, SeedLoader,
};

/// Re-export fixtures for test convenience
pub use catapi_core::testing::fixtures;

/// Credentials accepted by the default Basic rule.
pub const GOOD_CREDENTIALS: (&str, &str) = ("user1", "password");

/// Credentials rejected by the default Basic rule.
pub const BAD_CREDENTIALS: (&str, &str) = ("admin", "hunter2");

/// Default document written to the static directory.
pub const INDEX_HTML: &str = "<!doctype html><title>catapi</title><h1>Cats</h1>";

/// Test fixture for E2E testing with mock dependencies.
///
/// The store is seeded from [`fixtures::default_seed`] unless
/// [`TestConfig::seed`] says otherwise.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_love() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.put("/api/love/cat-tom").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock image fetcher - inspect or fail downloads
    pub images: Arc<MockImageFetcher>,
    /// The record store behind the service
    pub store: Arc<dyn CatStore>,
    /// Temporary directory for the store and seed files
    pub temp_dir: TempDir,
    /// Path of the JSON store file
    pub store_path: PathBuf,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with Basic auth and the default seed.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store_path = temp_dir.path().join("cats.json");
        let seed_path = temp_dir.path().join("seed.json");

        std::fs::write(&seed_path, fixtures::seed_json(&test_config.seed))
            .expect("Failed to write seed file");

        let static_dir = if test_config.static_site {
            let dir = temp_dir.path().join("site");
            std::fs::create_dir_all(&dir).expect("Failed to create static dir");
            std::fs::write(dir.join("index.html"), INDEX_HTML).expect("Failed to write index.html");
            format!("static_dir = \"{}\"", dir.display())
        } else {
            String::new()
        };

        let config = load_config_from_str(&format!(
            r#"
[auth]
method = "{}"

[server]
host = "127.0.0.1"
port = 8080
base_path = "{}"
{}

[storage]
backend = "json"
json_path = "{}"
seed_path = "{}"
"#,
            test_config.auth_method,
            test_config.base_path,
            static_dir,
            store_path.display(),
            seed_path.display(),
        ))
        .expect("Failed to parse test config");

        let authenticator: Arc<dyn Authenticator> = Arc::from(
            create_authenticator(&config.auth).expect("Failed to create authenticator"),
        );
        let store = open_store(&config.storage).expect("Failed to open store");
        let images = Arc::new(MockImageFetcher::new());

        let cats = Arc::new(CatalogService::new(
            Arc::clone(&store),
            SeedLoader::new(&seed_path),
            Arc::clone(&images) as Arc<dyn catapi_core::ImageFetcher>,
        ));
        cats.initialize().await.expect("Failed to seed store");

        let state = Arc::new(catapi_server::AppState::new(
            config,
            authenticator,
            cats,
            Arc::clone(&store),
        ));

        let router = catapi_server::create_router(state);

        Self {
            router,
            images,
            store,
            temp_dir,
            store_path,
        }
    }

    /// Send an anonymous GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a GET request with valid credentials.
    pub async fn get_authed(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, Some(GOOD_CREDENTIALS)).await
    }

    /// Send a POST request with JSON body and valid credentials.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), Some(GOOD_CREDENTIALS))
            .await
    }

    /// Send a PUT request with valid credentials.
    pub async fn put(&self, path: &str) -> TestResponse {
        self.request("PUT", path, None, Some(GOOD_CREDENTIALS)).await
    }

    /// Send a request with explicit credentials (or none).
    pub async fn send_as(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        credentials: Option<(&str, &str)>,
    ) -> TestResponse {
        self.request(method, path, body, credentials).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, basic_header(GOOD_CREDENTIALS))
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        credentials: Option<(&str, &str)>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(credentials) = credentials {
            request_builder = request_builder.header(header::AUTHORIZATION, basic_header(credentials));
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Read the JSON store file as written on disk.
    pub fn persisted(&self) -> Value {
        let contents = std::fs::read_to_string(&self.store_path).expect("Failed to read store");
        serde_json::from_str(&contents).expect("Store is not valid JSON")
    }
}

fn basic_header((user, pass): (&str, &str)) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// "none" or "basic"
    pub auth_method: &'static str,
    /// Route prefix
    pub base_path: &'static str,
    /// Records written to the seed file
    pub seed: Vec<catapi_core::Cat>,
    /// Serve a static directory holding [`INDEX_HTML`]
    pub static_site: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            auth_method: "basic",
            base_path: "/",
            seed: fixtures::default_seed(),
            static_site: false,
        }
    }
}

impl TestConfig {
    /// Config with authentication disabled.
    pub fn without_auth() -> Self {
        Self {
            auth_method: "none",
            ..Default::default()
        }
    }

    /// Config with routes mounted under `base_path`.
    pub fn with_base_path(base_path: &'static str) -> Self {
        Self {
            base_path,
            ..Default::default()
        }
    }

    /// Config serving a static site under `base_path`.
    pub fn with_static_site(base_path: &'static str) -> Self {
        Self {
            base_path,
            static_site: true,
            ..Default::default()
        }
    }

    /// Config with an empty seed document.
    pub fn empty() -> Self {
        Self {
            seed: Vec::new(),
            ..Default::default()
        }
    }
}
