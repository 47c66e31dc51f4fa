//! Catalog management queries.
//!
//! Rows are fetched as [`ProductRecord`] and converted into [`Product`];
//! drafts are written with their images serialized by
//! [`ProductDraft::stored_images`].

use jozoor_core::{Product, ProductDraft, ProductId, ProductRecord, StockStatus};
use sqlx::PgPool;

use super::RepositoryError;

/// Columns selected for every product query.
const PRODUCT_COLUMNS: &str = "id, name, description, price, category, stock, rating, \
     review_count, images, created_at, updated_at";

/// Number of low-stock products listed on the dashboard.
const LOW_STOCK_LIMIT: i64 = 10;

/// Dashboard figures.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub product_count: i64,
    pub category_count: i64,
    /// Products with stock at or below the low-stock threshold, emptiest first.
    pub low_stock: Vec<Product>,
}

/// Repository for catalog reads and writes.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first, optionally filtered by a case-insensitive
    /// search over name and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let search = search.map(str::trim).filter(|q| !q.is_empty());

        let rows = match search {
            Some(query) => {
                sqlx::query_as::<_, ProductRecord>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE name ILIKE $1 ESCAPE '\\' OR category ILIKE $1 ESCAPE '\\' \
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(like_pattern(query))
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

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRecord>(&format!(
            "INSERT INTO products \
             (name, description, price, category, stock, rating, review_count, images) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.category)
        .bind(draft.stock)
        .bind(draft.rating)
        .bind(draft.review_count)
        .bind(draft.stored_images())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, ProductRecord>(&format!(
            "UPDATE products SET name = $2, description = $3, price = $4, category = $5, \
             stock = $6, rating = $7, review_count = $8, images = $9, updated_at = NOW() \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.category)
        .bind(draft.stock)
        .bind(draft.rating)
        .bind(draft.review_count)
        .bind(draft.stored_images())
        .fetch_optional(self.pool)
        .await?
        .map(Product::from)
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete every product. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Distinct category labels, alphabetically (for the form's suggestions).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(|(category,)| category).collect())
    }

    /// Product and category counts plus the products running low.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let (product_count, category_count): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COUNT(DISTINCT category) FROM products")
                .fetch_one(self.pool)
                .await?;

        let low_stock = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock <= $1 ORDER BY stock ASC, name ASC LIMIT $2"
        ))
        .bind(StockStatus::LOW_STOCK_THRESHOLD)
        .bind(LOW_STOCK_LIMIT)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

        Ok(DashboardStats {
            product_count,
            category_count,
            low_stock,
        })
    }
}

/// `ILIKE` pattern matching `query` anywhere, with wildcards in the query
/// escaped.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_query() {
        assert_eq!(like_pattern("زيت"), "%زيت%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
