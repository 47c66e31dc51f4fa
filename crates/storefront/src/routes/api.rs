//! Read-only JSON product API.
//!
//! Products are serialized with `images` already resolved to a non-empty
//! list of URLs.

use axum::{
    Json,
    extract::{Path, State},
};
use jozoor_core::{Product, ProductId};
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/products` - all products, newest first.
#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    ProductRepository::new(state.pool())
        .list(None)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch products", &e))
}

/// `GET /api/products/{id}` - a single product.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id: ProductId = id
        .parse()
        .map_err(|_| ApiError::not_found("Product not found"))?;

    match ProductRepository::new(state.pool()).get(id).await {
        Ok(product) => Ok(Json(product)),
        Err(RepositoryError::NotFound) => Err(ApiError::not_found("Product not found")),
        Err(e) => Err(ApiError::internal("Failed to fetch product", &e)),
    }
}
