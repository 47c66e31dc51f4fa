//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use jozoor_core::ImageSize;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Rewrites a Cloudinary image URL to thumbnail size; other URLs pass through.
///
/// Usage in templates: `{{ product.image|thumbnail }}`
#[askama::filter_fn]
pub fn thumbnail(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(ImageSize::Thumbnail.apply(&value.to_string()))
}
