//! Posts and groups.
//!
//! This module contains the group and post models, their repositories,
//! pagination, the post form and the page operations built on them.

mod form;
mod group_repository;
mod paginator;
mod post_repository;
mod types;
mod views;

pub use form::{
    CleanedPost, FormErrors, FormOutcome, ImageChange, ImageUpload, PostForm, PostFormValidator,
    PostSubmission,
};
pub use group_repository::GroupRepository;
pub use paginator::{Page, Paginator, POSTS_PER_PAGE};
pub use post_repository::{PostRepository, PostScope};
pub use types::{Group, NewGroup, NewPost, Post, PostUpdate, TITLE_LENGTH};
pub use views::{
    post_detail_url, profile_url, Context, FormRequest, PostViews, Requester, ViewResponse,
    GROUP_LIST_TEMPLATE, INDEX_TEMPLATE, POST_DETAIL_TEMPLATE, POST_FORM_TEMPLATE,
    PROFILE_TEMPLATE,
};
