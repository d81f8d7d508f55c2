//! Common test utilities for E2E testing.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by a temporary media root and catalog index.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use vidshelf_core::{CacheConfig, Config, Library, LibraryConfig, ServerConfig, TagWritePolicy};
use vidshelf_server::state::AppState;

/// Test fixture for E2E testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list() {
///     let fixture = TestFixture::new();
///     fixture.add_video("cat_video", &["cat"]);
///
///     let response = fixture.get("/api/videos").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Media root holding one folder per video
    pub media_root: PathBuf,
    /// Catalog index file
    pub index_path: PathBuf,
    /// Temporary directory for media and index
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let media_root = temp_dir.path().join("videos");
        let index_path = temp_dir.path().join("catalog.json");

        let mut library_config = LibraryConfig::new(&media_root);
        library_config.index_path = index_path.clone();
        library_config.sort_entries = true;
        library_config.on_tag_write_failure = test_config.on_tag_write_failure;

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 3001, // Not used for in-process testing
                client_dir: test_config.client_dir,
            },
            library: library_config,
            cache: CacheConfig::default(),
        };

        let library = Arc::new(
            Library::open(&config.library, &config.cache).expect("Failed to open library"),
        );
        let state = Arc::new(AppState::new(config, library));
        let router = vidshelf_server::api::create_router(state);

        Self {
            router,
            media_root,
            index_path,
            temp_dir,
        }
    }

    /// Create a video folder with `clip.mp4`, `cover.jpg` and the given tags.
    pub fn add_video(&self, folder: &str, tags: &[&str]) -> PathBuf {
        self.add_folder(
            folder,
            &[
                ("clip.mp4", "video"),
                ("cover.jpg", "image"),
                ("tags.txt", &tags.join("\n")),
            ],
        )
    }

    /// Create a folder under the media root with the given files.
    pub fn add_folder(&self, folder: &str, files: &[(&str, &str)]) -> PathBuf {
        let path = self.media_root.join(folder);
        fs::create_dir_all(&path).expect("Failed to create folder");
        for (name, content) in files {
            fs::write(path.join(name), content).expect("Failed to write file");
        }
        path
    }

    /// Contents of a folder's tag file.
    pub fn tag_file(&self, folder: &str) -> String {
        fs::read_to_string(self.media_root.join(folder).join("tags.txt")).unwrap_or_default()
    }

    /// Parsed catalog index file.
    pub fn index(&self) -> Value {
        read_json(&self.index_path)
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
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
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            raw: body_bytes.to_vec(),
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Policy applied when a tag file cannot be written
    pub on_tag_write_failure: TagWritePolicy,
    /// Web client directory served as SPA fallback
    pub client_dir: Option<PathBuf>,
}

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("Failed to read JSON file");
    serde_json::from_str(&content).expect("Failed to parse JSON file")
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
