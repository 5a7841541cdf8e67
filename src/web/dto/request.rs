//! Request DTOs for the web layer.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use serde::Deserialize;

use crate::posts::{ImageUpload, PostSubmission};
use crate::web::error::ApiError;

/// Form field names accepted by the post form.
pub const TEXT_FIELD: &str = "text";
pub const GROUP_FIELD: &str = "group";
pub const IMAGE_FIELD: &str = "image";
pub const IMAGE_CLEAR_FIELD: &str = "image-clear";

/// Query parameters of listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Raw page number; anything unparsable means the first page.
    pub page: Option<String>,
}

/// Extractor for a submitted post form.
///
/// Accepts `multipart/form-data` (required for image uploads) and
/// `application/x-www-form-urlencoded`. Fields other than the post form's
/// own are dropped.
#[derive(Debug)]
pub struct PostSubmissionForm(pub PostSubmission);

#[async_trait]
impl<S> FromRequest<S> for PostSubmissionForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {}", e)))?;
            return read_multipart(multipart).await.map(PostSubmissionForm);
        }

        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid form data: {}", e)))?;

        Ok(PostSubmissionForm(submission_from_fields(fields)))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostSubmission, ApiError> {
    let mut submission = PostSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            TEXT_FIELD => {
                submission.text = field.text().await.map_err(multipart_error)?;
            }
            GROUP_FIELD => {
                submission.group = Some(field.text().await.map_err(multipart_error)?);
            }
            IMAGE_FIELD => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();

                // An empty file input is sent as an empty part
                if !data.is_empty() {
                    submission.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            IMAGE_CLEAR_FIELD => {
                submission.clear_image = is_checked(&field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(submission)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("Upload too large");
    }
    tracing::debug!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

/// Build a submission from urlencoded fields.
pub fn submission_from_fields(mut fields: HashMap<String, String>) -> PostSubmission {
    PostSubmission {
        text: fields.remove(TEXT_FIELD).unwrap_or_default(),
        group: fields.remove(GROUP_FIELD),
        image: None,
        clear_image: fields
            .get(IMAGE_CLEAR_FIELD)
            .map(|v| is_checked(v))
            .unwrap_or(false),
    }
}

/// Checkbox semantics: present means checked unless explicitly false.
fn is_checked(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "off" | "0"
    )
}
