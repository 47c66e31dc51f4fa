//! Type-safe price representation using decimal arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Store currency symbol, shown after the amount in Arabic.
pub const CURRENCY_SYMBOL: &str = "د.ج";

/// Store currency ISO 4217 code, shown before the amount in English.
pub const CURRENCY_CODE: &str = "DZD";

/// A price in the store currency, Algerian dinars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    /// Amount in dinars, not centimes.
    pub amount: Decimal,
}

impl Price {
    /// Create a price in the store currency.
    #[must_use]
    pub const fn store(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Format for display, rounded half-up to two decimal places.
    ///
    /// Arabic puts the currency symbol after the amount ("199.99 د.ج"),
    /// English uses the ISO code before it ("DZD 199.99").
    #[must_use]
    pub fn display(&self, locale: Locale) -> String {
        let amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        match locale {
            Locale::Ar => format!("{amount:.2} {CURRENCY_SYMBOL}"),
            Locale::En => format!("{CURRENCY_CODE} {amount:.2}"),
        }
    }
}
