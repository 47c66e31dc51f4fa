//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use jozoor_core::{Locale, Message};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::products::ProductRowView;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub locale: Locale,
    pub title: String,
    pub admin_name: String,
    pub current_path: &'static str,
    pub product_count: i64,
    pub category_count: i64,
    pub low_stock: Vec<ProductRowView>,
}

/// Dashboard page: catalog size and products running low.
///
/// GET /
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let locale = state.locale();
    let stats = ProductRepository::new(state.pool()).stats().await?;

    Ok(DashboardTemplate {
        locale,
        title: locale.text(Message::Dashboard).to_owned(),
        admin_name: admin.display_name,
        current_path: "/",
        product_count: stats.product_count,
        category_count: stats.category_count,
        low_stock: stats
            .low_stock
            .iter()
            .map(|p| ProductRowView::new(p, locale))
            .collect(),
    })
}
