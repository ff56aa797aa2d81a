//! Live HTTP tests for the NextShop catalog API.
//!
//! These tests talk to a running server and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the API against a disposable database
//! MONGO_URI=mongodb://localhost:27017 DB_NAME=nextshop_test cargo run -p nextshop-api
//!
//! # Run integration tests
//! cargo test -p nextshop-integration-tests -- --ignored
//! ```
//!
//! Set `API_BASE_URL` to target a server other than `http://localhost:5000`.

use reqwest::Client;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Build a URL for `path` on the API under test.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", api_base_url())
}

/// HTTP client for tests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A product name unique to this test run.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
