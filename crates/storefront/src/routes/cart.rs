//! Cart route handlers.
//!
//! The cart is kept in the visitor's session. Mutations answer HTMX requests
//! with a fragment and an `HX-Trigger: cart-updated` header; plain form posts
//! are redirected back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use jozoor_core::{Cart, CartItem, ImageSize, Locale, Message, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::{load_cart, save_cart};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, locale: Locale) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.as_i32(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: jozoor_core::Price::store(line.unit_price).display(locale),
                    line_price: line.line_price().display(locale),
                    image: ImageSize::Thumbnail.apply(&line.image),
                })
                .collect(),
            total: cart.total_price().display(locale),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Form data naming a single cart line.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub locale: Locale,
    pub cart_count: u32,
    pub title: String,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub locale: Locale,
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// Respond to a cart mutation with the refreshed items fragment, or a
/// redirect to the cart page for non-HTMX posts.
fn items_response(headers: &HeaderMap, cart: &Cart, locale: Locale) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            locale,
            cart: CartView::new(cart, locale),
        },
    )
        .into_response()
}

/// Load the cart, apply `change`, and persist it if anything changed.
async fn mutate_cart(session: &Session, change: impl FnOnce(&mut Cart) -> bool) -> Result<Cart> {
    let mut cart = load_cart(session).await;
    if change(&mut cart) {
        save_cart(session, &cart).await?;
    }
    Ok(cart)
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let locale = state.locale();
    let cart = load_cart(&session).await;

    CartShowTemplate {
        locale,
        cart_count: cart.item_count(),
        title: locale.text(Message::Cart).to_owned(),
        cart: CartView::new(&cart, locale),
    }
}

/// Add a product to the cart.
///
/// The product is looked up so the line carries the current name, price and
/// image rather than anything the client sent.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let locale = state.locale();
    let product = match ProductRepository::new(state.pool()).get(form.product_id).await {
        Ok(product) => product,
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound(
                locale.text(Message::ProductNotFound).to_owned(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if !product.in_stock() {
        return Err(AppError::BadRequest(
            locale.text(Message::OutOfStock).to_owned(),
        ));
    }

    let item = CartItem::new(
        product.id,
        product.name.clone(),
        product.price,
        form.quantity.unwrap_or(1),
        product.primary_image(),
    );
    let cart = mutate_cart(&session, |cart| {
        cart.add(item);
        true
    })
    .await?;

    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Set a line's quantity. Quantities below 1 are ignored.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let cart = mutate_cart(&session, |cart| {
        cart.set_quantity(form.product_id, form.quantity)
    })
    .await?;
    Ok(items_response(&headers, &cart, state.locale()))
}

/// Increase a line's quantity by one.
#[instrument(skip(state, session, headers))]
pub async fn increment(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let cart = mutate_cart(&session, |cart| cart.increment(form.product_id)).await?;
    Ok(items_response(&headers, &cart, state.locale()))
}

/// Decrease a line's quantity by one, never below 1.
#[instrument(skip(state, session, headers))]
pub async fn decrement(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let cart = mutate_cart(&session, |cart| cart.decrement(form.product_id)).await?;
    Ok(items_response(&headers, &cart, state.locale()))
}

/// Remove a line from the cart.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let cart = mutate_cart(&session, |cart| cart.remove(form.product_id)).await?;
    Ok(items_response(&headers, &cart, state.locale()))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: load_cart(&session).await.item_count(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::default();
        cart.add(CartItem::new(
            ProductId::new(1),
            "A",
            Decimal::from(100),
            2,
            "/a.jpg",
        ));
        cart.add(CartItem::new(
            ProductId::new(2),
            "B",
            Decimal::from(50),
            1,
            "/b.jpg",
        ));

        let view = CartView::new(&cart, Locale::Ar);
        assert_eq!(view.total, "250.00 د.ج");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items[0].line_price, "200.00 د.ج");
        assert_eq!(view.items[1].unit_price, "50.00 د.ج");
    }

    #[test]
    fn test_htmx_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", axum::http::HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}
