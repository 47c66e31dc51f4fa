//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use jozoor_core::{Locale, Message};
use tower_sessions::Session;
use tracing::instrument;

use super::products::{CategoryView, ProductCardView};
use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::models::load_cart;
use crate::state::AppState;

/// Number of featured products on the home page.
const FEATURED_LIMIT: i64 = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub locale: Locale,
    pub cart_count: u32,
    pub title: String,
    pub featured_products: Vec<ProductCardView>,
    pub categories: Vec<CategoryView>,
}

/// Display the home page: featured products and categories.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let locale = state.locale();
    let repo = ProductRepository::new(state.pool());

    let featured = repo.featured(FEATURED_LIMIT).await?;
    let categories = repo.categories().await?;

    Ok(HomeTemplate {
        locale,
        cart_count: load_cart(&session).await.item_count(),
        title: locale.text(Message::StoreName).to_owned(),
        featured_products: featured
            .iter()
            .map(|p| ProductCardView::new(p, locale))
            .collect(),
        categories: CategoryView::list(categories, None),
    })
}
