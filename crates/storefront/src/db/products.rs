//! Read-only catalog queries.
//!
//! Rows are fetched as [`ProductRecord`] and converted into [`Product`], which
//! resolves the stored `images` column once at this boundary.

use jozoor_core::{CategoryCount, Product, ProductId, ProductRecord};
use sqlx::PgPool;

use super::RepositoryError;

/// Columns selected for every product query.
const PRODUCT_COLUMNS: &str = "id, name, description, price, category, stock, rating, \
     review_count, images, created_at, updated_at";

/// Minimum rating for a product to be featured on the home page.
pub const FEATURED_MIN_RATING: f64 = 4.0;

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first, optionally limited to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, ProductRecord>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE category = $1 ORDER BY created_at DESC, id DESC"
                ))
                .bind(category)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRecord>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Product::from)
        .ok_or(RepositoryError::NotFound)
    }

    /// Newest well-rated products for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE rating >= $1 ORDER BY created_at DESC, id DESC LIMIT $2"
        ))
        .bind(FEATURED_MIN_RATING)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Other products in the same category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn related(
        &self,
        product: &Product,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE category = $1 AND id <> $2 ORDER BY created_at DESC, id DESC LIMIT $3"
        ))
        .bind(&product.category)
        .bind(product.id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Category labels with product counts, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<CategoryCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS product_count FROM products \
             GROUP BY category ORDER BY category",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
