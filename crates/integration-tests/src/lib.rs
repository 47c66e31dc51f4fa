//! Integration tests for the Jozoor store.
//!
//! These tests drive running servers over HTTP and are marked `#[ignore]`.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database
//! cargo run -p jozoor-cli -- migrate
//! cargo run -p jozoor-cli -- seed products seed/products.yaml --clear
//! cargo run -p jozoor-cli -- admin create -u tester -n "Tester" -p 'integration-pass'
//!
//! # Start both servers, then
//! ADMIN_TEST_USERNAME=tester ADMIN_TEST_PASSWORD=integration-pass \
//!     cargo test -p jozoor-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` (default `http://localhost:3000`)
//! - `ADMIN_BASE_URL` (default `http://localhost:3001`)
//! - `ADMIN_TEST_USERNAME` / `ADMIN_TEST_PASSWORD` - an existing admin account

#![allow(clippy::expect_used)]

use reqwest::{Client, StatusCode, redirect::Policy};

/// Base URL for the storefront.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A cookie-keeping client that does not follow redirects, so tests can
/// assert on `Location`.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A client logged in to the admin panel with the test account.
///
/// # Panics
///
/// Panics if the test credentials are not set or the login is rejected.
pub async fn authenticated_admin_client() -> Client {
    let username = std::env::var("ADMIN_TEST_USERNAME").expect("ADMIN_TEST_USERNAME not set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD not set");

    let client = client();
    let resp = client
        .post(format!("{}/login", admin_base_url()))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login was rejected");
    client
}
