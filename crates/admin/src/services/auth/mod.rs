//! Admin authentication service.
//!
//! Credentials are checked by an [`AdminAuthenticator`]; on success the
//! [`AdminGate`] stores the admin's identity in the server-side session. The
//! browser only ever holds the opaque session cookie.

mod error;
mod password;

pub use error::AuthError;
pub use password::{hash_password, verify_password};

use std::future::Future;
use std::pin::Pin;

use jozoor_core::Username;
use sqlx::PgPool;
use tower_sessions::Session;

use crate::db::AdminUserRepository;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};

/// Future returned by [`AdminAuthenticator::authenticate`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<CurrentAdmin, AuthError>> + Send + 'a>>;

/// Checks a username/password pair.
pub trait AdminAuthenticator: Send + Sync {
    /// Resolve the admin identified by `username` if `password` matches.
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown user or a wrong
    /// password; the two are not distinguished.
    fn authenticate<'a>(&'a self, username: &'a str, password: &'a str) -> AuthFuture<'a>;
}

/// Authenticator backed by the `admin_users` table and argon2 hashes.
#[derive(Clone)]
pub struct PasswordAuthenticator {
    pool: PgPool,
}

impl PasswordAuthenticator {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AdminAuthenticator for PasswordAuthenticator {
    fn authenticate<'a>(&'a self, username: &'a str, password: &'a str) -> AuthFuture<'a> {
        Box::pin(async move {
            let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;
            let stored = AdminUserRepository::new(&self.pool)
                .get_by_username(&username)
                .await?
                .ok_or(AuthError::InvalidCredentials)?;

            verify_password(password, &stored.password_hash)?;
            Ok(stored.user.into())
        })
    }
}

/// Session gate for the admin panel.
pub struct AdminGate<'a> {
    session: &'a Session,
}

impl<'a> AdminGate<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Check credentials and, on success, mark the session as logged in.
    ///
    /// The session ID is cycled on login so a session fixed before login
    /// cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank,
    /// `AuthError::InvalidCredentials` if the authenticator rejects the pair.
    pub async fn login(
        &self,
        authenticator: &dyn AdminAuthenticator,
        username: &str,
        password: &str,
    ) -> Result<CurrentAdmin, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let admin = match authenticator.authenticate(username, password).await {
            Ok(admin) => admin,
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Admin login failed");
                return Err(e);
            }
        };

        self.session.cycle_id().await?;
        set_current_admin(self.session, &admin).await?;
        crate::error::set_sentry_user(admin.id.as_i32(), Some(admin.username.as_str()));
        tracing::info!(admin_id = %admin.id, "Admin logged in");

        Ok(admin)
    }

    /// The logged-in admin, if any.
    pub async fn current(&self) -> Option<CurrentAdmin> {
        self.session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current().await.is_some()
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the session store fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        clear_current_admin(self.session).await?;
        self.session.flush().await?;
        crate::error::clear_sentry_user();
        Ok(())
    }
}
