//! Response DTOs for the web layer.

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::posts::{Context, ViewResponse};

/// Body of a rendered page: the template to use and its context.
#[derive(Debug, Serialize)]
pub struct RenderBody {
    /// Template name (e.g. `posts/index.html`).
    pub template: &'static str,
    /// Values the template is rendered with.
    pub context: Context,
}

impl IntoResponse for ViewResponse {
    fn into_response(self) -> Response {
        match self {
            ViewResponse::Render { template, context } => {
                (StatusCode::OK, Json(RenderBody { template, context })).into_response()
            }
            ViewResponse::Redirect { location } => {
                (StatusCode::FOUND, [(LOCATION, location)]).into_response()
            }
        }
    }
}
