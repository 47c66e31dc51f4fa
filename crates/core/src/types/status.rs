//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

use super::locale::{Locale, Message};

/// Stock availability of a product.
///
/// Derived from the stock count; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    /// In stock, at or below [`StockStatus::LOW_STOCK_THRESHOLD`] units.
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Stock level at which the admin dashboard flags a product.
    pub const LOW_STOCK_THRESHOLD: i32 = 5;

    /// Classify a stock count. Negative counts are treated as zero.
    #[must_use]
    pub const fn from_count(stock: i32) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock <= Self::LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Whether the product can be added to a cart.
    #[must_use]
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }

    /// Localized label for badges.
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::InStock | Self::LowStock => locale.text(Message::InStock),
            Self::OutOfStock => locale.text(Message::OutOfStock),
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InStock => write!(f, "in_stock"),
            Self::LowStock => write!(f, "low_stock"),
            Self::OutOfStock => write!(f, "out_of_stock"),
        }
    }
}
