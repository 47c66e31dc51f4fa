//! Cloudinary response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of an image upload.
///
/// Only the fields the admin panel reads are typed; everything else
/// Cloudinary returns is kept in `extra` so the upload endpoint can hand the
/// full response back to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a destroy call. `result` is `"ok"` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestroyResponse {
    pub result: String,
}

impl DestroyResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_keeps_unknown_fields() {
        let json = r#"{
            "public_id": "jozoor/argan-oil",
            "secure_url": "https://res.cloudinary.com/jozoor/image/upload/v1/jozoor/argan-oil.jpg",
            "width": 1200,
            "height": 900,
            "format": "jpg",
            "bytes": 48213,
            "etag": "abc"
        }"#;
        let response: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.public_id, "jozoor/argan-oil");
        assert_eq!(response.width, Some(1200));
        assert_eq!(response.extra.get("bytes"), Some(&Value::from(48213)));

        let back = serde_json::to_value(&response).unwrap();
        assert_eq!(back["etag"], "abc");
        assert_eq!(back["secure_url"], response.secure_url.as_str());
    }

    #[test]
    fn test_destroy_response_is_ok() {
        let ok: DestroyResponse = serde_json::from_str(r#"{"result":"ok"}"#).unwrap();
        assert!(ok.is_ok());
        let missing: DestroyResponse = serde_json::from_str(r#"{"result":"not found"}"#).unwrap();
        assert!(!missing.is_ok());
    }
}
