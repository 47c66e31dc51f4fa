//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! jozoor admin create -u amina -n "أمينة" -p 'a long passphrase'
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use jozoor_admin::db::{self, AdminUserRepository, RepositoryError};
use jozoor_admin::services::auth::{AuthError, hash_password};
use jozoor_core::{Username, UsernameError};
use thiserror::Error;

use super::database_url;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Display name left blank.
    #[error("Display name cannot be empty")]
    EmptyName,

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Password could not be hashed.
    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),
}

/// Check the inputs that can be validated without a database.
///
/// # Errors
///
/// Returns the first invalid input.
pub fn validate(username: &str, name: &str, password: &str) -> Result<Username, AdminError> {
    let username = Username::parse(username)?;

    if name.trim().is_empty() {
        return Err(AdminError::EmptyName);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    Ok(username)
}

/// Create a new admin user.
///
/// # Arguments
///
/// * `username` - Login name (stored lowercase)
/// * `name` - Admin's display name
/// * `password` - Plain password; only its argon2 hash is stored
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns an error if an input is invalid, the username is taken, or the
/// database is unreachable.
pub async fn create_user(username: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let username = validate(username, name, password)?;
    let password_hash = hash_password(password)?;

    let url = database_url("ADMIN_DATABASE_URL").map_err(AdminError::MissingEnvVar)?;

    tracing::info!("Connecting to admin database...");
    let pool = db::create_pool(&url).await?;

    tracing::info!("Creating admin user: {}", username.as_str());
    let admin = AdminUserRepository::new(&pool)
        .create(&username, name.trim(), &password_hash)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}",
        admin.id,
        admin.username.as_str()
    );

    Ok(admin.id.as_i32())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_normalizes_username() {
        let username = validate(" Amina ", "أمينة", "zaatar-and-olive").unwrap();
        assert_eq!(username.as_str(), "amina");
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(matches!(
            validate("", "أمينة", "zaatar-and-olive"),
            Err(AdminError::InvalidUsername(_))
        ));
        assert!(matches!(
            validate("amina", "  ", "zaatar-and-olive"),
            Err(AdminError::EmptyName)
        ));
        assert!(matches!(
            validate("amina", "أمينة", "short"),
            Err(AdminError::WeakPassword)
        ));
    }
}
