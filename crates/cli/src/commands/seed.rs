//! Seed the product catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: عسل السدر
//!     description: عسل طبيعي من جبال الأطلس
//!     price: "120.00"
//!     category: العسل
//!     stock: 12
//!     rating: 4.8
//!     reviews: 54
//!     images:
//!       - https://res.cloudinary.com/jozoor/image/upload/v1/jozoor/sidr-honey.jpg
//! ```
//!
//! `images` may be a single URL or a list; `rating` and `reviews` default to 0.

use std::path::Path;

use jozoor_admin::db::{self, ProductRepository};
use jozoor_core::ProductDraft;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::database_url;

/// Contents of a catalog seed file.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<ProductDraft>,
}

/// Check every product in the file, returning one message per problem.
#[must_use]
pub fn validate_catalog(catalog: &CatalogFile) -> Vec<String> {
    let mut errors = Vec::new();

    for (index, product) in catalog.products.iter().enumerate() {
        let label = if product.name.trim().is_empty() {
            format!("product #{}", index + 1)
        } else {
            product.name.clone()
        };

        if product.name.trim().is_empty() {
            errors.push(format!("{label}: name is required"));
        }
        if product.description.trim().is_empty() {
            errors.push(format!("{label}: description is required"));
        }
        if product.category.trim().is_empty() {
            errors.push(format!("{label}: category is required"));
        }
        if product.price <= Decimal::ZERO {
            errors.push(format!("{label}: price must be greater than zero"));
        }
        if product.stock < 0 {
            errors.push(format!("{label}: stock cannot be negative"));
        }
        if !(0.0..=5.0).contains(&product.rating) {
            errors.push(format!("{label}: rating must be between 0 and 5"));
        }
        if product.review_count < 0 {
            errors.push(format!("{label}: reviews cannot be negative"));
        }
    }

    errors
}

/// Seed products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog
/// * `clear_existing` - If true, delete all existing products first
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or fails validation, or database operations fail.
pub async fn products(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let url = database_url("ADMIN_DATABASE_URL")
        .map_err(|key| format!("{key} not set (and no DATABASE_URL fallback)"))?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading product catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    info!(products = catalog.products.len(), "Parsed catalog");

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = db::create_pool(&url).await?;
    info!("Connected to database");

    let repo = ProductRepository::new(&pool);

    if clear_existing {
        let removed = repo.delete_all().await?;
        warn!(removed, "Cleared existing products");
    }

    let mut inserted = 0usize;
    for draft in &catalog.products {
        let product = repo.create(draft).await?;
        info!(id = %product.id, name = %product.name, images = product.images.len(), "Inserted");
        inserted += 1;
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");

    Ok(())
}
