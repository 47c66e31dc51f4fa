//! Admin authentication error types.

use jozoor_core::{Locale, Message};
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur while logging an admin in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password left blank.
    #[error("username and password are required")]
    MissingCredentials,

    /// Unknown username or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Password could not be hashed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AuthError {
    /// Message shown on the login form.
    #[must_use]
    pub const fn message(&self, locale: Locale) -> &'static str {
        match self {
            Self::MissingCredentials => locale.text(Message::CredentialsRequired),
            Self::InvalidCredentials => locale.text(Message::InvalidCredentials),
            Self::PasswordHash | Self::Repository(_) | Self::Session(_) => {
                locale.text(Message::GenericError)
            }
        }
    }

    /// Whether the failure is on our side rather than the visitor's input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::PasswordHash | Self::Repository(_) | Self::Session(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_localized() {
        assert_eq!(
            AuthError::InvalidCredentials.message(Locale::Ar),
            "اسم المستخدم أو كلمة المرور غير صحيحة"
        );
        assert_eq!(
            AuthError::MissingCredentials.message(Locale::En),
            "Please enter your username and password"
        );
        assert!(!AuthError::PasswordHash.message(Locale::Ar).is_empty());
    }

    #[test]
    fn test_server_errors() {
        assert!(!AuthError::InvalidCredentials.is_server_error());
        assert!(AuthError::Repository(RepositoryError::NotFound).is_server_error());
    }
}
