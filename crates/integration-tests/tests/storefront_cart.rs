//! Integration tests for the session cart.
//!
//! These tests require:
//! - A migrated and seeded `PostgreSQL` database with at least one product
//!   in stock
//! - The storefront server running (cargo run -p jozoor-storefront)

#![allow(clippy::expect_used)]

use jozoor_integration_tests::{client, storefront_base_url};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// ID of the first in-stock product, from the JSON API.
async fn in_stock_product_id(client: &Client) -> i64 {
    let products: Vec<Value> = client
        .get(format!("{}/api/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Invalid JSON");

    products
        .iter()
        .find(|p| p["stock"].as_i64().unwrap_or(0) > 0)
        .and_then(|p| p["id"].as_i64())
        .expect("No product in stock; seed the database first")
}

/// Item count shown in the cart badge fragment.
async fn cart_count(client: &Client) -> u32 {
    let badge = client
        .get(format!("{}/cart/count", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get cart count")
        .text()
        .await
        .expect("Failed to read response");

    badge
        .split('>')
        .nth(1)
        .and_then(|rest| rest.split('<').next())
        .and_then(|n| n.trim().parse().ok())
        .expect("Badge has no count")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_add_update_remove() {
    let client = client();
    let base_url = storefront_base_url();
    let id = in_stock_product_id(&client).await.to_string();

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .header("HX-Request", "true")
        .form(&[("product_id", id.as_str()), ("quantity", "2")])
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(cart_count(&client).await, 2);

    // Quantities below one are ignored
    let resp = client
        .post(format!("{base_url}/cart/update"))
        .form(&[("product_id", id.as_str()), ("quantity", "0")])
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(cart_count(&client).await, 2);

    let resp = client
        .post(format!("{base_url}/cart/remove"))
        .form(&[("product_id", id.as_str())])
        .send()
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(cart_count(&client).await, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_carts_are_per_visitor() {
    let first = client();
    let second = client();
    let id = in_stock_product_id(&first).await.to_string();

    first
        .post(format!("{}/cart/add", storefront_base_url()))
        .form(&[("product_id", id.as_str())])
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(cart_count(&first).await, 1);
    assert_eq!(cart_count(&second).await, 0);
}
