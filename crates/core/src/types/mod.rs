//! Core types for Jozoor.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod images;
pub mod locale;
pub mod media;
pub mod price;
pub mod product;
pub mod status;
pub mod username;

pub use cart::{Cart, CartItem};
pub use id::*;
pub use images::{PLACEHOLDER_IMAGE, ProductImages};
pub use locale::{Locale, Message};
pub use media::{ImageSize, optimize_image_url, public_id_from_url};
pub use price::{CURRENCY_CODE, CURRENCY_SYMBOL, Price};
pub use product::{CategoryCount, Product, ProductDraft, ProductRecord};
pub use status::StockStatus;
pub use username::{Username, UsernameError};
