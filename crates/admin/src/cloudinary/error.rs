//! Error types for the Cloudinary client.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to Cloudinary.
#[derive(Debug, Error)]
pub enum CloudinaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cloudinary rejected the request.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Rate limited after all retries.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Destroy answered with something other than `ok`.
    #[error("destroy failed: {0}")]
    DestroyFailed(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error body returned by Cloudinary: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Nested error details.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cloudinary_error_display() {
        let err = CloudinaryError::Api {
            status: 401,
            message: "Invalid Signature".to_string(),
        };
        assert_eq!(err.to_string(), "API error (401): Invalid Signature");

        let err = CloudinaryError::DestroyFailed("not found".to_string());
        assert_eq!(err.to_string(), "destroy failed: not found");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{"error": {"message": "Upload preset not found"}}"#;
        let response: ApiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.message, "Upload preset not found");
    }
}
