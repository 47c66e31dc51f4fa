//! Product JSON API.
//!
//! `POST /api/products` accepts loosely typed bodies from older tooling:
//! numbers may arrive as JSON numbers or as strings, and `images` may be a
//! single URL, a JSON-encoded array, or an array.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use jozoor_core::{Product, ProductDraft, ProductId, ProductImages};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::ApiError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::SuccessResponse;

/// Fields that must be present and non-blank on create, in reporting order.
const REQUIRED_FIELDS: [&str; 5] = ["name", "price", "description", "category", "stock"];

/// `GET /api/products` - all products, newest first.
#[instrument(skip_all)]
pub async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    ProductRepository::new(state.pool())
        .list(None)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch products", &e))
}

/// `POST /api/products` - create a product.
#[instrument(skip_all)]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(body) = body?;
    let draft = parse_draft(&body)?;

    let product = ProductRepository::new(state.pool())
        .create(&draft)
        .await
        .map_err(|e| ApiError::internal("Failed to create product", &e))?;

    tracing::info!(
        product_id = %product.id,
        admin = %admin.username.as_str(),
        "Product created via API"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// `DELETE /api/products/{id}` - delete a product.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id: ProductId = id
        .parse()
        .map_err(|_| ApiError::not_found("Product not found"))?;

    match ProductRepository::new(state.pool()).delete(id).await {
        Ok(()) => Ok(Json(SuccessResponse::ok())),
        Err(RepositoryError::NotFound) => Err(ApiError::not_found("Product not found")),
        Err(e) => Err(ApiError::internal("Failed to delete product", &e)),
    }
}

/// Build a draft from a create request body.
///
/// # Errors
///
/// Returns a 400 `ApiError` naming the first missing required field, or the
/// first field whose value has the wrong shape.
pub fn parse_draft(body: &Map<String, Value>) -> Result<ProductDraft, ApiError> {
    if let Some(field) = REQUIRED_FIELDS
        .into_iter()
        .find(|field| is_missing(body.get(*field)))
    {
        return Err(ApiError::bad_request(format!("Field '{field}' is required")));
    }

    let price = decimal_field(body, "price")?;
    let stock = integer_field(body, "stock")?;
    let rating = match body.get("rating") {
        Some(value) if !is_blank(Some(value)) => {
            number_as_text(value)
                .and_then(|text| f64::from_str(&text).ok())
                .filter(|r| (0.0..=5.0).contains(r))
                .ok_or_else(|| invalid("rating"))?
        }
        _ => 0.0,
    };
    let review_count = match body.get("reviews").or_else(|| body.get("review_count")) {
        Some(value) if !is_blank(Some(value)) => non_negative_int(value, "reviews")?,
        _ => 0,
    };
    let images = match body.get("images") {
        Some(value) => {
            ProductImages::deserialize(value.clone()).map_err(|_| invalid("images"))?
        }
        None => ProductImages::None,
    };

    Ok(ProductDraft {
        name: text_field(body, "name"),
        description: text_field(body, "description"),
        price,
        category: text_field(body, "category"),
        stock,
        rating,
        review_count,
        images,
    })
}

/// Absent, null, or a blank string.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Required fields also treat numeric zero and `false` as missing, so a zero
/// price or stock is reported as not supplied.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Some(Value::Bool(b)) => !b,
        other => is_blank(other),
    }
}

fn invalid(field: &str) -> ApiError {
    ApiError::bad_request(format!("Field '{field}' is invalid"))
}

fn text_field(body: &Map<String, Value>, field: &str) -> String {
    match body.get(field) {
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// A number or numeric string as text.
fn number_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_owned()),
        _ => None,
    }
}

fn decimal_field(body: &Map<String, Value>, field: &str) -> Result<Decimal, ApiError> {
    body.get(field)
        .and_then(number_as_text)
        .and_then(|text| Decimal::from_str(&text).ok())
        .filter(|d| !d.is_sign_negative())
        .map(|d| d.round_dp(2))
        .ok_or_else(|| invalid(field))
}

fn integer_field(body: &Map<String, Value>, field: &str) -> Result<i32, ApiError> {
    body.get(field)
        .map_or_else(|| Err(invalid(field)), |value| non_negative_int(value, field))
}

fn non_negative_int(value: &Value, field: &str) -> Result<i32, ApiError> {
    number_as_text(value)
        .and_then(|text| text.parse::<i32>().ok())
        .filter(|n| *n >= 0)
        .ok_or_else(|| invalid(field))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    fn complete() -> Value {
        json!({
            "name": "تمر دقلة نور",
            "price": "89.99",
            "description": "تمور بسكرة",
            "category": "الفواكه",
            "stock": 40,
        })
    }

    #[test]
    fn test_minimal_body_uses_defaults() {
        let draft = parse_draft(&body(complete())).unwrap();
        assert_eq!(draft.price, Decimal::new(8999, 2));
        assert_eq!(draft.stock, 40);
        assert!(draft.rating.abs() < f64::EPSILON);
        assert_eq!(draft.review_count, 0);
        assert_eq!(draft.images, ProductImages::None);
    }

    #[test]
    fn test_each_required_field_is_reported() {
        for field in REQUIRED_FIELDS {
            for blank in [Value::Null, json!(""), json!("   ")] {
                let mut map = body(complete());
                map.insert(field.to_owned(), blank);
                let err = parse_draft(&map).unwrap_err();
                assert_eq!(err.status, StatusCode::BAD_REQUEST);
                assert_eq!(err.error, format!("Field '{field}' is required"));
            }

            let mut map = body(complete());
            map.remove(field);
            assert_eq!(
                parse_draft(&map).unwrap_err().error,
                format!("Field '{field}' is required")
            );
        }
    }

    #[test]
    fn test_numbers_accepted_as_strings_or_numbers() {
        let mut map = body(complete());
        map.insert("price".to_owned(), json!(120.5));
        map.insert("stock".to_owned(), json!("12"));
        map.insert("rating".to_owned(), json!("4.5"));
        map.insert("reviews".to_owned(), json!(76));

        let draft = parse_draft(&map).unwrap();
        assert_eq!(draft.price, Decimal::new(1205, 1));
        assert_eq!(draft.stock, 12);
        assert!((draft.rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(draft.review_count, 76);
    }

    #[test]
    fn test_numeric_zero_counts_as_missing() {
        for (field, zero) in [("stock", json!(0)), ("price", json!(0)), ("price", json!(0.0))] {
            let mut map = body(complete());
            map.insert(field.to_owned(), zero);
            assert_eq!(
                parse_draft(&map).unwrap_err().error,
                format!("Field '{field}' is required")
            );
        }

        let mut map = body(complete());
        map.insert("stock".to_owned(), json!("0"));
        assert_eq!(parse_draft(&map).unwrap().stock, 0);
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        let mut map = body(complete());
        map.insert("price".to_owned(), json!("cheap"));
        assert_eq!(
            parse_draft(&map).unwrap_err().error,
            "Field 'price' is invalid"
        );

        let mut map = body(complete());
        map.insert("stock".to_owned(), json!(-1));
        assert_eq!(
            parse_draft(&map).unwrap_err().error,
            "Field 'stock' is invalid"
        );
    }

    #[test]
    fn test_images_accept_string_or_array() {
        let mut map = body(complete());
        map.insert("images".to_owned(), json!(["/a.jpg", "/b.jpg"]));
        assert_eq!(parse_draft(&map).unwrap().images.len(), 2);

        let mut map = body(complete());
        map.insert("images".to_owned(), json!(r#"["/a.jpg","/b.jpg","/c.jpg"]"#));
        assert_eq!(parse_draft(&map).unwrap().images.len(), 3);

        let mut map = body(complete());
        map.insert("images".to_owned(), json!("/honey.jpg"));
        assert_eq!(
            parse_draft(&map).unwrap().images,
            ProductImages::Single("/honey.jpg".to_owned())
        );

        let mut map = body(complete());
        map.insert("images".to_owned(), json!(42));
        assert!(parse_draft(&map).is_err());
    }
}
