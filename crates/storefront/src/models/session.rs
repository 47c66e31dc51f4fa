//! Session-related types.
//!
//! The visitor's cart lives in their server-side session, serialized as JSON.

use jozoor_core::Cart;
use tower_sessions::Session;

/// Session keys for visitor data.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";
}

/// Load the visitor's cart. A missing or unreadable cart is empty.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read cart from session: {e}");
            Cart::default()
        }
    }
}

/// Store the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session cannot be serialized or written.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use jozoor_core::{CartItem, ProductId};
    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_cart_round_trips_through_session() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert!(load_cart(&session).await.is_empty());

        let mut cart = Cart::default();
        cart.add(CartItem::new(
            ProductId::new(1),
            "عسل طبيعي",
            Decimal::new(19999, 2),
            2,
            "/images/placeholder.jpg",
        ));
        save_cart(&session, &cart).await.unwrap();

        assert_eq!(load_cart(&session).await, cart);
    }
}
