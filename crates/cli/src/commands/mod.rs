//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read a database URL from `primary_key`, falling back to `DATABASE_URL`.
///
/// # Errors
///
/// Returns the name of `primary_key` if neither variable is set.
pub fn database_url(primary_key: &'static str) -> Result<SecretString, &'static str> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| primary_key)
}
