//! Cloudinary media API client.
//!
//! Product images are uploaded to and deleted from Cloudinary from the admin
//! panel. Requests are signed with the API secret, sent with a 30 second
//! timeout and retried a bounded number of times on transient failures.
//!
//! # Endpoints
//!
//! - `POST {api}/{cloud}/image/upload` - multipart upload
//! - `POST {api}/{cloud}/image/destroy` - delete by public ID

pub mod client;
mod error;
pub mod types;

pub use client::{CloudinaryClient, RetryPolicy, sign_params};
pub use error::CloudinaryError;
pub use types::{DestroyResponse, UploadResponse};
