//! Catalog product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::images::ProductImages;
use super::price::Price;
use super::status::StockStatus;

/// A product as shown to visitors and returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Free-text category label.
    pub category: String,
    pub stock: i32,
    /// Average rating, 0 to 5.
    pub rating: f64,
    #[serde(rename = "reviews")]
    pub review_count: i32,
    pub images: ProductImages,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_count(self.stock)
    }

    /// Unit price in the store currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::store(self.price)
    }

    /// Primary image URL.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.primary()
    }
}

/// Input for creating or replacing a product.
///
/// Used by the admin forms, the admin JSON API and the YAML seed files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, alias = "reviews")]
    pub review_count: i32,
    #[serde(default)]
    pub images: ProductImages,
}

impl ProductDraft {
    /// The `images` column value for this draft.
    #[must_use]
    pub fn stored_images(&self) -> String {
        self.images.to_stored()
    }
}

/// A category label with the number of products in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CategoryCount {
    pub category: String,
    pub product_count: i64,
}

/// Raw `products` row.
///
/// The `images` column is resolved into [`ProductImages`] when the row is
/// converted, so nothing downstream sees the stored string.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    pub rating: f64,
    pub review_count: i32,
    pub images: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRecord> for Product {
    fn from(row: ProductRecord) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            stock: row.stock,
            rating: row.rating,
            review_count: row.review_count,
            images: ProductImages::parse(row.images.as_deref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
