//! Product management pages.
//!
//! The create and edit pages share one form. Invalid submissions re-render
//! it with the entered values and a localized message under each bad field.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use jozoor_core::{
    ImageSize, Locale, Message, Product, ProductDraft, ProductId, ProductImages, StockStatus,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Product row display data for the listing and the dashboard.
#[derive(Clone)]
pub struct ProductRowView {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: i32,
    pub stock_label: &'static str,
    pub low_stock: bool,
    pub thumbnail: String,
    pub image_count: usize,
}

impl ProductRowView {
    #[must_use]
    pub fn new(product: &Product, locale: Locale) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.unit_price().display(locale),
            stock: product.stock,
            stock_label: product.stock_status().label(locale),
            low_stock: product.stock_status() != StockStatus::InStock,
            thumbnail: ImageSize::Thumbnail.apply(product.primary_image()),
            image_count: product.images.len(),
        }
    }
}

/// Raw product form fields, kept as text so they can be shown back as typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    /// One image URL per line.
    pub images: String,
    /// Checkbox; present when ticked.
    pub in_stock: Option<String>,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<&'static str>,
    pub description: Option<&'static str>,
    pub price: Option<&'static str>,
    pub category: Option<&'static str>,
    pub stock: Option<&'static str>,
    pub images: Option<&'static str>,
}

impl FormErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.stock.is_none()
            && self.images.is_none()
    }
}

impl ProductForm {
    /// An empty form for a new product, with "in stock" ticked.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            in_stock: Some("on".to_owned()),
            ..Self::default()
        }
    }

    /// Prefill the form from a stored product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            stock: product.stock.to_string(),
            images: product.images.urls().join("\n"),
            in_stock: product.in_stock().then(|| "on".to_owned()),
        }
    }

    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.in_stock.is_some()
    }

    /// Validate the form into a draft.
    ///
    /// Rating and review count are not editable here; they are carried over
    /// from `existing` when editing and start at zero otherwise.
    ///
    /// # Errors
    ///
    /// Returns every failing field's message at once.
    pub fn validate(
        &self,
        locale: Locale,
        existing: Option<&Product>,
    ) -> std::result::Result<ProductDraft, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.name = Some(locale.text(Message::NameRequired));
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.description = Some(locale.text(Message::DescriptionRequired));
        }

        let price = Decimal::from_str(self.price.trim())
            .ok()
            .filter(|p| *p > Decimal::ZERO);
        if price.is_none() {
            errors.price = Some(locale.text(Message::PriceMustBePositive));
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.category = Some(locale.text(Message::CategoryRequired));
        }

        let stock = if self.is_in_stock() {
            self.stock.trim().parse::<i32>().ok().filter(|s| *s > 0)
        } else {
            Some(0)
        };
        if stock.is_none() {
            errors.stock = Some(locale.text(Message::StockMustBePositive));
        }

        let images = ProductImages::from_urls(self.images.lines().map(str::to_owned).collect());
        if images.is_empty() {
            errors.images = Some(locale.text(Message::ImageRequired));
        }

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductDraft {
                name: name.to_owned(),
                description: description.to_owned(),
                price: price.round_dp(2),
                category: category.to_owned(),
                stock,
                rating: existing.map_or(0.0, |p| p.rating),
                review_count: existing.map_or(0, |p| p.review_count),
                images,
            }),
            _ => Err(errors),
        }
    }
}

/// Listing search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub locale: Locale,
    pub title: String,
    pub admin_name: String,
    pub current_path: &'static str,
    pub products: Vec<ProductRowView>,
    pub search_query: String,
}

/// Create/edit form page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub locale: Locale,
    pub title: String,
    pub admin_name: String,
    pub current_path: &'static str,
    /// Where the form posts to.
    pub action: String,
    /// Set when editing.
    pub product_id: Option<i32>,
    pub form: ProductForm,
    pub errors: FormErrors,
    pub categories: Vec<String>,
}

impl ProductFormTemplate {
    fn new_product(locale: Locale, admin_name: String, categories: Vec<String>) -> Self {
        Self {
            locale,
            title: locale.text(Message::NewProduct).to_owned(),
            admin_name,
            current_path: "/products",
            action: "/products".to_owned(),
            product_id: None,
            form: ProductForm::blank(),
            errors: FormErrors::default(),
            categories,
        }
    }

    fn edit_product(
        locale: Locale,
        admin_name: String,
        id: ProductId,
        categories: Vec<String>,
    ) -> Self {
        Self {
            title: locale.text(Message::EditProduct).to_owned(),
            action: format!("/products/{id}"),
            product_id: Some(id.as_i32()),
            ..Self::new_product(locale, admin_name, categories)
        }
    }

    fn with_input(self, form: ProductForm, errors: FormErrors) -> Self {
        Self {
            form,
            errors,
            ..self
        }
    }
}

/// Parse a path ID and load the product, mapping both failures to a
/// localized 404.
async fn load_product(state: &AppState, id: &str) -> Result<Product> {
    let locale = state.locale();
    let not_found = || AppError::NotFound(locale.text(Message::ProductNotFound).to_owned());

    let id: ProductId = id.parse().map_err(|_| not_found())?;
    match ProductRepository::new(state.pool()).get(id).await {
        Ok(product) => Ok(product),
        Err(RepositoryError::NotFound) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

/// Product listing, newest first, with optional name or category search.
///
/// GET /products
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let locale = state.locale();
    let search_query = query.q.unwrap_or_default().trim().to_owned();

    let products = ProductRepository::new(state.pool())
        .list(Some(&search_query))
        .await?;

    Ok(ProductsIndexTemplate {
        locale,
        title: locale.text(Message::Products).to_owned(),
        admin_name: admin.display_name,
        current_path: "/products",
        products: products
            .iter()
            .map(|p| ProductRowView::new(p, locale))
            .collect(),
        search_query,
    })
}

/// Empty product form.
///
/// GET /products/new
#[instrument(skip(admin, state))]
pub async fn new_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let categories = ProductRepository::new(state.pool()).categories().await?;

    Ok(ProductFormTemplate::new_product(
        state.locale(),
        admin.display_name,
        categories,
    ))
}

/// Create a product.
///
/// POST /products
#[instrument(skip(admin, state, form))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let locale = state.locale();
    let repo = ProductRepository::new(state.pool());

    match form.validate(locale, None) {
        Ok(draft) => {
            let product = repo.create(&draft).await?;
            tracing::info!(
                product_id = %product.id,
                admin = %admin.username.as_str(),
                "Product created"
            );
            Ok(Redirect::to("/products").into_response())
        }
        Err(errors) => {
            let page = ProductFormTemplate::new_product(
                locale,
                admin.display_name,
                repo.categories().await?,
            )
            .with_input(form, errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Prefilled product form.
///
/// GET /products/{id}/edit
#[instrument(skip(admin, state))]
pub async fn edit_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = load_product(&state, &id).await?;
    let categories = ProductRepository::new(state.pool()).categories().await?;

    Ok(ProductFormTemplate::edit_product(
        state.locale(),
        admin.display_name,
        product.id,
        categories,
    )
    .with_input(ProductForm::from_product(&product), FormErrors::default()))
}

/// Save changes to a product.
///
/// POST /products/{id}
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let locale = state.locale();
    let existing = load_product(&state, &id).await?;
    let repo = ProductRepository::new(state.pool());

    match form.validate(locale, Some(&existing)) {
        Ok(draft) => {
            repo.update(existing.id, &draft).await?;
            tracing::info!(
                product_id = %existing.id,
                admin = %admin.username.as_str(),
                "Product updated"
            );
            Ok(Redirect::to("/products").into_response())
        }
        Err(errors) => {
            let page = ProductFormTemplate::edit_product(
                locale,
                admin.display_name,
                existing.id,
                repo.categories().await?,
            )
            .with_input(form, errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Delete a product.
///
/// POST /products/{id}/delete
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let product = load_product(&state, &id).await?;
    ProductRepository::new(state.pool())
        .delete(product.id)
        .await?;

    tracing::info!(
        product_id = %product.id,
        admin = %admin.username.as_str(),
        "Product deleted"
    );
    Ok(Redirect::to("/products"))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: " عسل السدر ".to_owned(),
            description: "عسل طبيعي من جبال الأطلس".to_owned(),
            price: "120.5".to_owned(),
            category: "العسل".to_owned(),
            stock: "7".to_owned(),
            images: "https://res.cloudinary.com/d/image/upload/v1/jozoor/a.jpg\n\n/images/b.jpg\n"
                .to_owned(),
            in_stock: Some("on".to_owned()),
        }
    }

    fn stored_product() -> Product {
        Product {
            id: ProductId::new(9),
            name: "زيت زيتون".to_owned(),
            description: "بكر ممتاز".to_owned(),
            price: Decimal::new(4500, 2),
            category: "الزيوت".to_owned(),
            stock: 3,
            rating: 4.7,
            review_count: 31,
            images: ProductImages::Gallery(vec!["/a.jpg".to_owned(), "/b.jpg".to_owned()]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_form_becomes_draft() {
        let draft = valid_form().validate(Locale::Ar, None).unwrap();
        assert_eq!(draft.name, "عسل السدر");
        assert_eq!(draft.price, Decimal::new(12050, 2));
        assert_eq!(draft.stock, 7);
        assert_eq!(draft.images.len(), 2);
        assert!(draft.rating.abs() < f64::EPSILON);
        assert_eq!(draft.review_count, 0);
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let form = ProductForm {
            in_stock: Some("on".to_owned()),
            price: "0".to_owned(),
            stock: "0".to_owned(),
            ..ProductForm::default()
        };

        let errors = form.validate(Locale::Ar, None).unwrap_err();
        assert_eq!(errors.name, Some("اسم المنتج مطلوب"));
        assert!(errors.description.is_some());
        assert!(errors.price.is_some());
        assert!(errors.category.is_some());
        assert!(errors.stock.is_some());
        assert!(errors.images.is_some());
    }

    #[test]
    fn test_out_of_stock_ignores_stock_field() {
        let form = ProductForm {
            in_stock: None,
            stock: "not a number".to_owned(),
            ..valid_form()
        };
        assert_eq!(form.validate(Locale::En, None).unwrap().stock, 0);
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let form = ProductForm {
            price: "-3".to_owned(),
            ..valid_form()
        };
        let errors = form.validate(Locale::En, None).unwrap_err();
        assert!(errors.price.is_some());
        assert!(errors.name.is_none());
    }

    #[test]
    fn test_edit_keeps_rating_and_reviews() {
        let existing = stored_product();
        let draft = ProductForm::from_product(&existing)
            .validate(Locale::Ar, Some(&existing))
            .unwrap();
        assert_eq!(draft.review_count, 31);
        assert!((draft.rating - 4.7).abs() < f64::EPSILON);
        assert_eq!(draft.images, existing.images);
        assert_eq!(draft.price, existing.price);
    }

    #[test]
    fn test_prefill_lists_one_url_per_line() {
        let form = ProductForm::from_product(&stored_product());
        assert_eq!(form.images, "/a.jpg\n/b.jpg");
        assert!(form.is_in_stock());
    }

    #[test]
    fn test_row_view_flags_low_stock() {
        let row = ProductRowView::new(&stored_product(), Locale::Ar);
        assert!(row.low_stock);
        assert_eq!(row.image_count, 2);
        assert_eq!(row.price, "45.00 د.ج");
    }
}
