//! Application state shared across handlers.

use std::sync::Arc;

use jozoor_core::Locale;
use sqlx::PgPool;

use crate::cloudinary::CloudinaryClient;
use crate::config::AdminConfig;
use crate::services::auth::{AdminAuthenticator, PasswordAuthenticator};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    cloudinary: CloudinaryClient,
    authenticator: Arc<dyn AdminAuthenticator>,
}

impl AppState {
    /// Create state with the database-backed password authenticator.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let authenticator = Arc::new(PasswordAuthenticator::new(pool.clone()));
        let cloudinary = CloudinaryClient::new(config.cloudinary.clone());
        Self::with_parts(config, pool, cloudinary, authenticator)
    }

    /// Create state from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        config: AdminConfig,
        pool: PgPool,
        cloudinary: CloudinaryClient,
        authenticator: Arc<dyn AdminAuthenticator>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cloudinary,
                authenticator,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn cloudinary(&self) -> &CloudinaryClient {
        &self.inner.cloudinary
    }

    #[must_use]
    pub fn authenticator(&self) -> &dyn AdminAuthenticator {
        self.inner.authenticator.as_ref()
    }

    /// Display language for pages and messages.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.inner.config.locale
    }
}
