//! Jozoor Core - Shared domain types.
//!
//! This crate provides the types used across all Jozoor components:
//! - `storefront` - Public-facing shop (Arabic-first)
//! - `admin` - Product management panel
//! - `cli` - Command-line tools for migrations, admin users and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Row mappings for `PostgreSQL` are available behind
//! the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, product images, the cart, media URLs and locales

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
