//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Auth (public)
//! GET  /login                  - Login page
//! POST /login                  - Username/password login
//! POST /logout                 - Logout
//!
//! # Pages (admin session required, otherwise redirect to /login)
//! GET  /                       - Dashboard
//! GET  /products               - Product table (?q= name or category search)
//! GET  /products/new           - New product form
//! POST /products               - Create product
//! GET  /products/{id}/edit     - Edit product form
//! POST /products/{id}          - Update product
//! POST /products/{id}/delete   - Delete product
//!
//! # JSON API (admin session required, otherwise 401)
//! GET    /api/products          - All products, newest first
//! POST   /api/products          - Create product (201)
//! DELETE /api/products/{id}     - Delete product
//! POST   /api/upload            - Upload image to Cloudinary (multipart `file`)
//! POST   /api/cloudinary/delete - Delete image from Cloudinary ({publicId})
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the login/logout router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product management router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_form))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_form))
        .route("/{id}/delete", post(products::delete))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(api::products::list).post(api::products::create),
        )
        .route("/products/{id}", axum::routing::delete(api::products::delete))
        .route(
            "/upload",
            post(api::media::upload).layer(DefaultBodyLimit::max(api::media::MAX_UPLOAD_BYTES)),
        )
        .route("/cloudinary/delete", post(api::media::delete_image))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .merge(auth_routes())
        .nest("/products", product_routes())
        .nest("/api", api_routes())
}
