//! Product image upload and removal through Cloudinary.

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
};
use jozoor_core::public_id_from_url;
use serde::Deserialize;
use tracing::instrument;

use crate::cloudinary::UploadResponse;
use crate::error::ApiError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

use super::SuccessResponse;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A file read from the `file` multipart field.
struct UploadedFile {
    data: Vec<u8>,
    file_name: String,
    content_type: Option<String>,
}

/// `POST /api/upload` - forward a multipart `file` to Cloudinary.
///
/// An optional `upload_preset` field overrides the configured preset.
#[instrument(skip_all)]
pub async fn upload(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut file = None;
    let mut upload_preset = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                if !data.is_empty() {
                    file = Some(UploadedFile {
                        data: data.to_vec(),
                        file_name,
                        content_type,
                    });
                }
            }
            Some("upload_preset") => {
                upload_preset = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let size = file.data.len();

    let uploaded = state
        .cloudinary()
        .upload(
            file.data,
            &file.file_name,
            file.content_type.as_deref(),
            upload_preset.as_deref(),
        )
        .await
        .map_err(|e| ApiError::internal("Failed to upload image", &e))?;

    tracing::info!(
        public_id = %uploaded.public_id,
        bytes = size,
        admin = %admin.username.as_str(),
        "Image uploaded"
    );
    Ok(Json(uploaded))
}

/// Body of `POST /api/cloudinary/delete`.
///
/// `url` is accepted in place of `publicId`; the public ID is then taken from
/// the last two path segments.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteImageRequest {
    pub public_id: Option<String>,
    pub url: Option<String>,
}

impl DeleteImageRequest {
    fn resolved_public_id(&self) -> Option<String> {
        self.public_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .or_else(|| self.url.as_deref().and_then(public_id_from_url))
    }
}

/// `POST /api/cloudinary/delete` - remove an image from Cloudinary.
#[instrument(skip_all)]
pub async fn delete_image(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    request: Result<Json<DeleteImageRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(request) = request?;
    let public_id = request
        .resolved_public_id()
        .ok_or_else(|| ApiError::bad_request("Public ID is required"))?;

    state
        .cloudinary()
        .destroy(&public_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete image", &e))?;

    tracing::info!(
        public_id = %public_id,
        admin = %admin.username.as_str(),
        "Image deleted"
    );
    Ok(Json(SuccessResponse::ok()))
}
