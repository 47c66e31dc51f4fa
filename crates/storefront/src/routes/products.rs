//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use jozoor_core::{CategoryCount, ImageSize, Locale, Message, Product, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::load_cart;
use crate::state::AppState;

/// Maximum related products shown on a detail page.
const RELATED_LIMIT: i64 = 4;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: String,
    pub rating: String,
    pub review_count: i32,
    pub in_stock: bool,
    pub stock_label: &'static str,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, locale: Locale) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.unit_price().display(locale),
            image: ImageSize::Card.apply(product.primary_image()),
            rating: format!("{:.1}", product.rating),
            review_count: product.review_count,
            in_stock: product.in_stock(),
            stock_label: product.stock_status().label(locale),
        }
    }
}

/// One gallery image in its display sizes.
#[derive(Clone)]
pub struct GalleryImageView {
    pub main: String,
    pub zoom: String,
    pub thumbnail: String,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub card: ProductCardView,
    pub description: String,
    pub gallery: Vec<GalleryImageView>,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, locale: Locale) -> Self {
        Self {
            card: ProductCardView::new(product, locale),
            description: product.description.clone(),
            gallery: product
                .images
                .resolve()
                .iter()
                .map(|url| GalleryImageView {
                    main: ImageSize::Gallery.apply(url),
                    zoom: ImageSize::Zoom.apply(url),
                    thumbnail: ImageSize::Thumbnail.apply(url),
                })
                .collect(),
        }
    }
}

/// Category filter link.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub count: i64,
    pub active: bool,
}

impl CategoryView {
    #[must_use]
    pub fn list(categories: Vec<CategoryCount>, active: Option<&str>) -> Vec<Self> {
        categories
            .into_iter()
            .map(|c| Self {
                active: active == Some(c.category.as_str()),
                name: c.category,
                count: c.product_count,
            })
            .collect()
    }
}

/// Listing filter query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub locale: Locale,
    pub cart_count: u32,
    pub title: String,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryView>,
    pub filtered: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub locale: Locale,
    pub cart_count: u32,
    pub title: String,
    pub product: ProductDetailView,
    pub related_products: Vec<ProductCardView>,
}

/// Display product listing page, newest first.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let locale = state.locale();
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let repo = ProductRepository::new(state.pool());
    let products = repo.list(category).await?;
    let categories = repo.categories().await?;

    Ok(ProductsIndexTemplate {
        locale,
        cart_count: load_cart(&session).await.item_count(),
        title: category.map_or_else(|| locale.text(Message::Products).to_owned(), str::to_owned),
        products: products
            .iter()
            .map(|p| ProductCardView::new(p, locale))
            .collect(),
        categories: CategoryView::list(categories, category),
        filtered: category.is_some(),
    })
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let locale = state.locale();
    let not_found = || AppError::NotFound(locale.text(Message::ProductNotFound).to_owned());

    let id: ProductId = id.parse().map_err(|_| not_found())?;

    let repo = ProductRepository::new(state.pool());
    let product = match repo.get(id).await {
        Ok(product) => product,
        Err(RepositoryError::NotFound) => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    let related = repo.related(&product, RELATED_LIMIT).await?;

    Ok(ProductShowTemplate {
        locale,
        cart_count: load_cart(&session).await.item_count(),
        title: product.name.clone(),
        product: ProductDetailView::new(&product, locale),
        related_products: related
            .iter()
            .map(|p| ProductCardView::new(p, locale))
            .collect(),
    })
}
