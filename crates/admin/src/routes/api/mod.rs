//! JSON API handlers for admin.
//!
//! Every endpoint requires an admin session; without one the response is
//! 401 `{"error": "Unauthorized"}`.

pub mod media;
pub mod products;

use serde::Serialize;

/// `{"success": true}` body for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
