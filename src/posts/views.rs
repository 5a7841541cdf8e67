//! Request handling for the post pages.
//!
//! Each operation loads what its page needs and returns a [`ViewResponse`]:
//! a template name with its context, or a redirect. The HTTP layer only
//! extracts the inputs and turns the response into JSON or a `302`.

use serde::Serialize;
use tracing::{info, warn};

use super::form::{FormOutcome, ImageChange, PostForm, PostFormValidator, PostSubmission};
use super::group_repository::GroupRepository;
use super::paginator::Page;
use super::post_repository::{PostRepository, PostScope};
use super::types::{Group, NewPost, Post, PostUpdate};
use crate::db::{found, DbPool, User, UserRepository};
use crate::media::MediaStorage;
use crate::{Result, YatubeError};

pub const INDEX_TEMPLATE: &str = "posts/index.html";
pub const GROUP_LIST_TEMPLATE: &str = "posts/group_list.html";
pub const PROFILE_TEMPLATE: &str = "posts/profile.html";
pub const POST_DETAIL_TEMPLATE: &str = "posts/post_detail.html";
pub const POST_FORM_TEMPLATE: &str = "posts/create_post.html";

/// URL of an author's profile page.
pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

/// URL of a post's page.
pub fn post_detail_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}

/// Template context, one variant per page.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Context {
    Index {
        page_obj: Page<Post>,
    },
    GroupList {
        group: Group,
        page_obj: Page<Post>,
        title: String,
    },
    Profile {
        author: User,
        page_obj: Page<Post>,
        posts_count: u64,
    },
    PostDetail {
        post: Post,
        title: String,
        post_count: u64,
    },
    PostForm {
        form: PostForm,
        is_edit: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        post: Option<Post>,
    },
}

/// Outcome of a page request.
#[derive(Debug, Clone)]
pub enum ViewResponse {
    /// Render `template` with `context`.
    Render {
        template: &'static str,
        context: Context,
    },
    /// Send the client to `location`.
    Redirect { location: String },
}

impl ViewResponse {
    fn render(template: &'static str, context: Context) -> Self {
        ViewResponse::Render { template, context }
    }

    fn redirect(location: impl Into<String>) -> Self {
        ViewResponse::Redirect {
            location: location.into(),
        }
    }

    /// HTTP status code for this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            ViewResponse::Render { .. } => 200,
            ViewResponse::Redirect { .. } => 302,
        }
    }

    /// Template name, for render outcomes.
    pub fn template(&self) -> Option<&'static str> {
        match self {
            ViewResponse::Render { template, .. } => Some(*template),
            ViewResponse::Redirect { .. } => None,
        }
    }

    /// Redirect target, for redirect outcomes.
    pub fn location(&self) -> Option<&str> {
        match self {
            ViewResponse::Render { .. } => None,
            ViewResponse::Redirect { location } => Some(location.as_str()),
        }
    }
}

/// The authenticated user making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
    pub username: String,
}

/// A request to a form page.
#[derive(Debug, Clone)]
pub enum FormRequest {
    /// GET: show the form.
    Show,
    /// POST: submitted values.
    Submit(PostSubmission),
}

/// Page operations over the database and media storage.
pub struct PostViews<'a> {
    pool: &'a DbPool,
    media: &'a MediaStorage,
    max_image_size: u64,
}

impl<'a> PostViews<'a> {
    pub fn new(pool: &'a DbPool, media: &'a MediaStorage, max_image_size: u64) -> Self {
        Self {
            pool,
            media,
            max_image_size,
        }
    }

    fn posts(&self) -> PostRepository<'a> {
        PostRepository::new(self.pool)
    }

    /// Main feed: every post, newest first.
    pub async fn index(&self, page: Option<&str>) -> Result<ViewResponse> {
        let page_obj = self.posts().page(PostScope::All, page).await?;
        Ok(ViewResponse::render(
            INDEX_TEMPLATE,
            Context::Index { page_obj },
        ))
    }

    /// Posts of one group.
    pub async fn group_posts(&self, slug: &str, page: Option<&str>) -> Result<ViewResponse> {
        let group = found(GroupRepository::new(self.pool).get_by_slug(slug).await?)?;
        let page_obj = self.posts().page(PostScope::Group(group.id), page).await?;
        let title = format!("Записи сообщества: {}", group);

        Ok(ViewResponse::render(
            GROUP_LIST_TEMPLATE,
            Context::GroupList {
                group,
                page_obj,
                title,
            },
        ))
    }

    /// An author's posts and post count.
    pub async fn profile(&self, username: &str, page: Option<&str>) -> Result<ViewResponse> {
        let author = found(UserRepository::new(self.pool).get_by_username(username).await?)?;
        let page_obj = self.posts().page(PostScope::Author(author.id), page).await?;
        let posts_count = page_obj.count;

        Ok(ViewResponse::render(
            PROFILE_TEMPLATE,
            Context::Profile {
                author,
                page_obj,
                posts_count,
            },
        ))
    }

    /// A single post.
    pub async fn post_detail(&self, post_id: i64) -> Result<ViewResponse> {
        let post = found(self.posts().get_by_id(post_id).await?)?;
        let post_count = self.posts().count(PostScope::Author(post.author_id)).await?;
        let title = post.title();

        Ok(ViewResponse::render(
            POST_DETAIL_TEMPLATE,
            Context::PostDetail {
                post,
                title,
                post_count,
            },
        ))
    }

    /// Show the new-post form or publish a submission.
    pub async fn post_create(
        &self,
        requester: &Requester,
        request: FormRequest,
    ) -> Result<ViewResponse> {
        let author = found(UserRepository::new(self.pool).get_by_id(requester.user_id).await?)?;
        let validator = PostFormValidator::load(self.pool, self.max_image_size).await?;

        let submission = match request {
            FormRequest::Show => {
                return Ok(form_page(PostForm::blank(validator.into_choices()), None));
            }
            FormRequest::Submit(submission) => submission,
        };

        let cleaned = match validator.validate(&submission) {
            FormOutcome::Valid(cleaned) => cleaned,
            FormOutcome::Invalid(errors) => {
                let form =
                    PostForm::from_submission(&submission, None, errors, validator.into_choices());
                return Ok(form_page(form, None));
            }
        };

        let image = match cleaned.image {
            ImageChange::Replace(upload) => Some(self.media.save(&upload.data, &upload.file_name)?),
            ImageChange::Keep | ImageChange::Clear => None,
        };

        let new_post = NewPost {
            text: cleaned.text,
            author_id: author.id,
            group_id: cleaned.group_id,
            image: image.clone(),
        };

        match self.posts().create(&new_post).await {
            Ok(post) => info!("Post {} created by {}", post.id, author.username),
            Err(e) => {
                self.discard_upload(image.as_deref());
                return Err(e);
            }
        }

        Ok(ViewResponse::redirect(profile_url(&author.username)))
    }

    /// Show the edit form or apply a submission. Only the author may edit.
    pub async fn post_edit(
        &self,
        requester: &Requester,
        post_id: i64,
        request: FormRequest,
    ) -> Result<ViewResponse> {
        let post = found(self.posts().get_by_id(post_id).await?)?;

        if !post.is_authored_by(requester.user_id) {
            info!(
                "User {} may not edit post {}; redirecting",
                requester.username, post.id
            );
            return Ok(ViewResponse::redirect(post_detail_url(post.id)));
        }

        let validator = PostFormValidator::load(self.pool, self.max_image_size).await?;

        let submission = match request {
            FormRequest::Show => {
                let form = PostForm::from_post(&post, validator.into_choices());
                return Ok(form_page(form, Some(post)));
            }
            FormRequest::Submit(submission) => submission,
        };

        let cleaned = match validator.validate(&submission) {
            FormOutcome::Valid(cleaned) => cleaned,
            FormOutcome::Invalid(errors) => {
                let form = PostForm::from_submission(
                    &submission,
                    post.image.clone(),
                    errors,
                    validator.into_choices(),
                );
                return Ok(form_page(form, Some(post)));
            }
        };

        let mut update = PostUpdate::new()
            .text(cleaned.text)
            .group(cleaned.group_id);
        let mut stored = None;

        let replaced = match cleaned.image {
            ImageChange::Keep => None,
            ImageChange::Clear => {
                update = update.image(None);
                post.image.clone()
            }
            ImageChange::Replace(upload) => {
                let reference = self.media.save(&upload.data, &upload.file_name)?;
                update = update.image(Some(reference.clone()));
                stored = Some(reference);
                post.image.clone()
            }
        };

        match self.posts().update(post.id, &update).await {
            Ok(Some(_)) => info!("Post {} edited by {}", post.id, requester.username),
            Ok(None) => {
                self.discard_upload(stored.as_deref());
                return Err(YatubeError::NotFound("post".to_string()));
            }
            Err(e) => {
                self.discard_upload(stored.as_deref());
                return Err(e);
            }
        }

        self.discard_upload(replaced.as_deref());
        Ok(ViewResponse::redirect(post_detail_url(post.id)))
    }

    fn discard_upload(&self, reference: Option<&str>) {
        if let Some(reference) = reference {
            if let Err(e) = self.media.delete(reference) {
                warn!("Failed to delete media file {}: {}", reference, e);
            }
        }
    }
}

fn form_page(form: PostForm, post: Option<Post>) -> ViewResponse {
    let is_edit = post.is_some();
    ViewResponse::render(
        POST_FORM_TEMPLATE,
        Context::PostForm {
            form,
            is_edit,
            post,
        },
    )
}
