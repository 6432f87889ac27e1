//! Common test utilities for in-process API testing.
//!
//! Builds the real router around a `HashService` whose job delay is short
//! enough for tests to wait it out.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use hasher_core::{
    Config, Digester, HashService, JobsConfig, MemoryResultStore, Sha512Digester,
};
use hasher_server::api::create_router;
use hasher_server::state::AppState;

/// Job delay used by default in API tests.
pub const TEST_DELAY_MS: u64 = 50;

/// In-process server fixture.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The service behind the router
    pub service: Arc<HashService>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

impl TestFixture {
    /// Create a fixture with the SHA-512 digester and the default test delay.
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(TEST_DELAY_MS))
    }

    /// Create a fixture with a custom job delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self::with_digester(Arc::new(Sha512Digester::new()), delay)
    }

    /// Create a fixture around a custom digester.
    pub fn with_digester(digester: Arc<dyn Digester>, delay: Duration) -> Self {
        let service = Arc::new(HashService::with_components(
            Arc::new(MemoryResultStore::new()),
            digester,
            delay,
        ));
        let config = Config {
            jobs: JobsConfig {
                delay_ms: delay.as_millis() as u64,
            },
            ..Config::default()
        };
        let state = Arc::new(AppState::new(config, Arc::clone(&service)));

        Self {
            router: create_router(state),
            service,
        }
    }

    /// Wait out one job delay plus some slack.
    pub async fn wait_for_jobs(&self) {
        tokio::time::sleep(self.service.job_delay() + Duration::from_millis(100)).await;
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// POST an url-encoded form body.
    pub async fn post_form(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, Some(body.to_string())).await
    }

    /// POST with no body and no content type.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    async fn request(&self, method: &str, path: &str, form: Option<String>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);
        let request = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
