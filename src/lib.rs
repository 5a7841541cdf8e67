//! Yatube - a small blogging service.
//!
//! Authors publish text posts, optionally filed under a community group and
//! illustrated with an image. Visitors browse a paginated feed, group pages,
//! author profiles and single posts.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod media;
pub mod posts;
pub mod web;

pub use config::Config;
pub use db::{Database, DbPool, NewUser, User, UserRepository};
pub use error::{Result, YatubeError};
pub use media::MediaStorage;
pub use posts::{
    FormOutcome, Group, GroupRepository, NewGroup, NewPost, Page, Paginator, Post, PostForm,
    PostRepository, PostScope, PostSubmission, PostUpdate, PostViews, ViewResponse,
};
