//! Integration tests for admin authentication and product management.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database with a test admin account
//! - The admin server running (cargo run -p jozoor-admin)
//!
//! Run with: cargo test -p jozoor-integration-tests -- --ignored

#![allow(clippy::expect_used)]

use jozoor_integration_tests::{admin_base_url, authenticated_admin_client, client};
use reqwest::{StatusCode, header};
use serde_json::{Value, json};
use uuid::Uuid;

// ============================================================================
// Session Gate
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_pages_redirect_to_login() {
    let resp = client()
        .get(format!("{}/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to get products page");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/login");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_api_is_unauthorized_without_session() {
    let resp = client()
        .get(format!("{}/api/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to call API");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_wrong_password_is_rejected() {
    let resp = client()
        .post(format!("{}/login", admin_base_url()))
        .form(&[("username", "admin"), ("password", "definitely-wrong")])
        .send()
        .await
        .expect("Failed to post login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("alert-error"));
}

// ============================================================================
// Product API
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and test admin credentials"]
async fn test_api_create_then_delete() {
    let client = authenticated_admin_client().await;
    let base_url = admin_base_url();
    let name = format!("منتج تجريبي {}", Uuid::new_v4());

    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": name,
            "price": "15.50",
            "description": "وصف تجريبي",
            "category": "تجربة",
            "stock": 3,
            "images": ["/images/placeholder.jpg"],
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(product["name"], name);
    assert_eq!(product["reviews"], 0);
    let id = product["id"].as_i64().expect("id is a number");

    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["success"], true);

    let resp = client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and test admin credentials"]
async fn test_api_create_missing_field() {
    let client = authenticated_admin_client().await;

    let resp = client
        .post(format!("{}/api/products", admin_base_url()))
        .json(&json!({
            "name": "ناقص",
            "price": 10,
            "description": "",
            "category": "تجربة",
            "stock": 1,
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["error"], "Field 'description' is required");
}

#[tokio::test]
#[ignore = "Requires running admin server and test admin credentials"]
async fn test_search_matches_category_case_insensitively() {
    let client = authenticated_admin_client().await;
    let base_url = admin_base_url();
    let marker = Uuid::new_v4().simple().to_string();
    let name = format!("منتج للبحث {marker}");

    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": name,
            "price": 20,
            "description": "وصف",
            "category": format!("Spices-{marker}"),
            "stock": 2,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Invalid JSON");
    let id = product["id"].as_i64().expect("id is a number");

    let resp = client
        .get(format!("{base_url}/products?q=SPICES-{marker}"))
        .send()
        .await
        .expect("Failed to search products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&name));

    client
        .delete(format!("{base_url}/api/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
}

// ============================================================================
// Product Form
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and test admin credentials"]
async fn test_form_validation_errors_are_shown() {
    let client = authenticated_admin_client().await;

    let resp = client
        .post(format!("{}/products", admin_base_url()))
        .form(&[
            ("name", ""),
            ("description", ""),
            ("price", "0"),
            ("category", ""),
            ("stock", "0"),
            ("in_stock", "on"),
            ("images", ""),
        ])
        .send()
        .await
        .expect("Failed to post form");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.matches("field-error").count() >= 6);
}

#[tokio::test]
#[ignore = "Requires running admin server and test admin credentials"]
async fn test_dashboard_and_logout() {
    let client = authenticated_admin_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(&base_url)
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .get(&base_url)
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}
