//! Post page handlers.

use axum::extract::{Path, Query, State};
use std::sync::Arc;

use super::AppState;
use crate::posts::{FormRequest, ViewResponse};
use crate::web::dto::{PageQuery, PostSubmissionForm};
use crate::web::error::ApiError;
use crate::web::middleware::LoginRequired;

/// Post IDs that don't parse can't exist.
fn parse_post_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Post not found"))
}

/// GET / - Main feed.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<ViewResponse, ApiError> {
    Ok(state.views().index(query.page.as_deref()).await?)
}

/// GET /group/:slug/ - Posts of a group.
pub async fn group_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ViewResponse, ApiError> {
    Ok(state
        .views()
        .group_posts(&slug, query.page.as_deref())
        .await?)
}

/// GET /profile/:username/ - An author's posts.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<ViewResponse, ApiError> {
    Ok(state
        .views()
        .profile(&username, query.page.as_deref())
        .await?)
}

/// GET /posts/:post_id/ - A single post.
pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<ViewResponse, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    Ok(state.views().post_detail(post_id).await?)
}

/// GET /create/ - Empty post form.
pub async fn post_create_form(
    State(state): State<Arc<AppState>>,
    LoginRequired(requester): LoginRequired,
) -> Result<ViewResponse, ApiError> {
    Ok(state
        .views()
        .post_create(&requester, FormRequest::Show)
        .await?)
}

/// POST /create/ - Publish a post.
pub async fn post_create(
    State(state): State<Arc<AppState>>,
    LoginRequired(requester): LoginRequired,
    PostSubmissionForm(submission): PostSubmissionForm,
) -> Result<ViewResponse, ApiError> {
    Ok(state
        .views()
        .post_create(&requester, FormRequest::Submit(submission))
        .await?)
}

/// GET /posts/:post_id/edit/ - Prefilled post form.
pub async fn post_edit_form(
    State(state): State<Arc<AppState>>,
    LoginRequired(requester): LoginRequired,
    Path(post_id): Path<String>,
) -> Result<ViewResponse, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    Ok(state
        .views()
        .post_edit(&requester, post_id, FormRequest::Show)
        .await?)
}

/// POST /posts/:post_id/edit/ - Save changes to a post.
pub async fn post_edit(
    State(state): State<Arc<AppState>>,
    LoginRequired(requester): LoginRequired,
    Path(post_id): Path<String>,
    PostSubmissionForm(submission): PostSubmissionForm,
) -> Result<ViewResponse, ApiError> {
    let post_id = parse_post_id(&post_id)?;
    Ok(state
        .views()
        .post_edit(&requester, post_id, FormRequest::Submit(submission))
        .await?)
}
