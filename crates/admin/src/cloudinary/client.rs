//! Cloudinary REST client with request signing and bounded retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::config::CloudinaryConfig;

use super::error::{ApiErrorResponse, CloudinaryError};
use super::types::{DestroyResponse, UploadResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How many times a request is attempted and how long to wait in between.
///
/// The wait doubles after every failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given (1-based) failed attempt.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

/// Cloudinary API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct CloudinaryClient {
    inner: Arc<CloudinaryClientInner>,
}

struct CloudinaryClientInner {
    client: reqwest::Client,
    config: CloudinaryConfig,
    retry: RetryPolicy,
}

impl CloudinaryClient {
    /// Create a client with the default retry policy.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    /// Create a client with a custom retry policy.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn with_retry_policy(config: CloudinaryConfig, retry: RetryPolicy) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(CloudinaryClientInner {
                client,
                config,
                retry,
            }),
        }
    }

    /// Upload preset used when a request does not name one.
    #[must_use]
    pub fn default_upload_preset(&self) -> &str {
        &self.inner.config.upload_preset
    }

    /// Upload an image.
    ///
    /// # Errors
    ///
    /// Returns `CloudinaryError::Api` if Cloudinary rejects the upload,
    /// `CloudinaryError::Http` on network failures that outlast the retries.
    #[instrument(skip(self, data, content_type), fields(bytes = data.len()))]
    pub async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: Option<&str>,
        upload_preset: Option<&str>,
    ) -> Result<UploadResponse, CloudinaryError> {
        let config = &self.inner.config;
        let preset = upload_preset
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&config.upload_preset)
            .to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("timestamp", &timestamp), ("upload_preset", &preset)],
            config.api_secret.expose_secret(),
        );
        let url = config.image_endpoint("upload");

        // Multipart forms are consumed on send, so each attempt builds its own.
        let response = self
            .send_with_retry(|| {
                let mut file = Part::bytes(data.clone()).file_name(file_name.to_string());
                if let Some(mime) = content_type {
                    file = file.mime_str(mime)?;
                }
                let form = Form::new()
                    .part("file", file)
                    .text("upload_preset", preset.clone())
                    .text("api_key", config.api_key.clone())
                    .text("timestamp", timestamp.clone())
                    .text("signature", signature.clone());
                Ok(self.inner.client.post(&url).multipart(form))
            })
            .await?;

        let uploaded: UploadResponse = parse_response(response).await?;
        tracing::info!(public_id = %uploaded.public_id, "Image uploaded");
        Ok(uploaded)
    }

    /// Delete an image by public ID.
    ///
    /// # Errors
    ///
    /// Returns `CloudinaryError::DestroyFailed` if Cloudinary answers with any
    /// result other than `ok`, `CloudinaryError::Api` if it rejects the call.
    #[instrument(skip(self))]
    pub async fn destroy(&self, public_id: &str) -> Result<DestroyResponse, CloudinaryError> {
        let config = &self.inner.config;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            config.api_secret.expose_secret(),
        );
        let url = config.image_endpoint("destroy");
        let params = [
            ("public_id", public_id),
            ("api_key", config.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .send_with_retry(|| Ok(self.inner.client.post(&url).form(&params)))
            .await?;

        let destroyed: DestroyResponse = parse_response(response).await?;
        if !destroyed.is_ok() {
            return Err(CloudinaryError::DestroyFailed(destroyed.result));
        }
        tracing::info!("Image deleted");
        Ok(destroyed)
    }

    /// Send a request, retrying connection failures, 429 and 5xx responses.
    async fn send_with_retry<F>(&self, build: F) -> Result<reqwest::Response, CloudinaryError>
    where
        F: Fn() -> Result<reqwest::RequestBuilder, CloudinaryError>,
    {
        let policy = self.inner.retry;
        let mut attempt = 1;

        loop {
            let outcome = build()?.send().await;
            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => is_retryable_error(e),
            };
            if !retryable || attempt >= policy.max_attempts {
                return outcome.map_err(CloudinaryError::from);
            }

            let delay = policy.backoff(attempt);
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            match &outcome {
                Ok(response) => tracing::warn!(
                    attempt,
                    status = response.status().as_u16(),
                    delay_ms,
                    "Cloudinary request failed, retrying"
                ),
                Err(e) => tracing::warn!(
                    attempt,
                    error = %e,
                    delay_ms,
                    "Cloudinary request failed, retrying"
                ),
            }

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Decode a successful response body, or turn an error status into a
/// `CloudinaryError`.
async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CloudinaryError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body)
            .map_err(|e| CloudinaryError::Parse(format!("Failed to parse response: {e}")));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return Err(CloudinaryError::RateLimited(retry_after));
    }

    let body = response.text().await?;
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => api_error.error.message,
        Err(_) => body,
    };
    Err(CloudinaryError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Sign request parameters.
///
/// Pairs with empty values are dropped, the rest sorted by key and joined as
/// `key=value&key=value`; the API secret is appended and the result hashed
/// with SHA-256 (hex encoded).
#[must_use]
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut pairs: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{to_sign}{api_secret}").as_bytes()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::tests::test_cloudinary_config;

    fn test_client(base_url: &str) -> CloudinaryClient {
        CloudinaryClient::with_retry_policy(
            test_cloudinary_config(base_url),
            RetryPolicy {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(1),
            },
        )
    }

    fn upload_body() -> serde_json::Value {
        serde_json::json!({
            "public_id": "jozoor/dates",
            "secure_url": "https://res.cloudinary.com/jozoor/image/upload/v1/jozoor/dates.jpg",
            "format": "jpg",
            "bytes": 1024
        })
    }

    #[test]
    fn test_sign_params_known_digest() {
        let signature = sign_params(
            &[("timestamp", "1315060510"), ("public_id", "sample")],
            "abcd",
        );
        assert_eq!(
            signature,
            "0d4fe14b2b4a3f68a97ccc5097c43908b623d24293c296826a9390c14d891509"
        );
    }

    #[test]
    fn test_sign_params_is_order_independent() {
        let a = sign_params(&[("a", "1"), ("b", "2"), ("c", "3")], "s3cr3t");
        let b = sign_params(&[("c", "3"), ("a", "1"), ("b", "2")], "s3cr3t");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_sign_params_skips_empty_values() {
        let with_empty = sign_params(&[("a", "1"), ("folder", "")], "s3cr3t");
        let without = sign_params(&[("a", "1")], "s3cr3t");
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(250));
        assert_eq!(policy.backoff(2), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_upload_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jozoor/image/upload"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/jozoor/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upload_body()))
            .expect(1)
            .mount(&server)
            .await;

        let uploaded = test_client(&server.uri())
            .upload(b"jpeg".to_vec(), "dates.jpg", Some("image/jpeg"), None)
            .await
            .unwrap();

        assert_eq!(uploaded.public_id, "jozoor/dates");
        assert_eq!(uploaded.extra.get("bytes"), Some(&serde_json::Value::from(1024)));
    }

    #[tokio::test]
    async fn test_upload_gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(
                serde_json::json!({"error": {"message": "General Error"}}),
            ))
            .expect(3)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .upload(b"jpeg".to_vec(), "dates.jpg", None, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CloudinaryError::Api { status: 500, ref message } if message == "General Error"
        ));
    }

    #[tokio::test]
    async fn test_upload_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"error": {"message": "Upload preset not found"}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .upload(b"jpeg".to_vec(), "dates.jpg", None, Some("missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, CloudinaryError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_upload_sends_default_preset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("jozoor_store"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upload_body()))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server.uri())
            .upload(b"jpeg".to_vec(), "dates.jpg", None, Some("  "))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_destroy_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jozoor/image/destroy"))
            .and(body_string_contains("public_id=jozoor%2Fdates"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = test_client(&server.uri())
            .destroy("jozoor/dates")
            .await
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_destroy_not_found_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jozoor/image/destroy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"result": "not found"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .destroy("jozoor/missing")
            .await
            .unwrap_err();
        assert!(matches!(err, CloudinaryError::DestroyFailed(ref r) if r == "not found"));
    }
}
