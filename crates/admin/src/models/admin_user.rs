//! Admin user domain types.

use chrono::{DateTime, Utc};

use jozoor_core::{AdminUserId, Username};

/// An admin user (domain type).
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name.
    pub username: Username,
    /// Name shown in the panel header.
    pub display_name: String,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
}
