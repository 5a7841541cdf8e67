//! Group and post models for Yatube.

use std::fmt;

use serde::Serialize;

use crate::db::Entity;

/// Number of characters of the text used as a post's page title.
pub const TITLE_LENGTH: usize = 30;

/// A community that posts can be filed under.
///
/// Groups are created by operators; the request handlers only read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Group {
    /// Unique group ID.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// URL-safe unique identifier.
    pub slug: String,
    /// Free-form description.
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl Entity for Group {
    const NAME: &'static str = "group";
}

/// Data for creating a new group.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    /// Create a new group with an empty description.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A post as shown in listings, joined with its author and group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post text.
    pub text: String,
    /// Creation timestamp (UTC).
    pub created_at: String,
    /// ID of the author.
    pub author_id: i64,
    /// Username of the author.
    pub author_username: String,
    /// ID of the group, `None` when the post is not grouped.
    pub group_id: Option<i64>,
    /// Slug of the group.
    pub group_slug: Option<String>,
    /// Title of the group.
    pub group_title: Option<String>,
    /// Stored image reference relative to the media root (e.g. `posts/cat.gif`).
    pub image: Option<String>,
}

impl Post {
    /// The first [`TITLE_LENGTH`] characters of the text.
    pub fn title(&self) -> String {
        self.text.chars().take(TITLE_LENGTH).collect()
    }

    /// Check whether the given user wrote this post.
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

impl Entity for Post {
    const NAME: &'static str = "post";
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

impl NewPost {
    /// Create an ungrouped post without an image.
    pub fn new(author_id: i64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author_id,
            group_id: None,
            image: None,
        }
    }

    /// File the post under a group.
    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Attach a stored image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Changes to an existing post.
///
/// The author is deliberately absent: it never changes after creation.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    /// New text.
    pub text: Option<String>,
    /// New group (`Some(None)` removes the post from its group).
    pub group_id: Option<Option<i64>>,
    /// New image reference (`Some(None)` removes the image).
    pub image: Option<Option<String>>,
}

impl PostUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the group.
    pub fn group(mut self, group_id: Option<i64>) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Set the image reference.
    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = Some(image);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.group_id.is_none() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            text: text.to_string(),
            created_at: "2024-01-01 00:00:00.000".to_string(),
            author_id: 7,
            author_username: "leo".to_string(),
            group_id: None,
            group_slug: None,
            group_title: None,
            image: None,
        }
    }

    #[test]
    fn test_title_short_text() {
        assert_eq!(post("Short").title(), "Short");
    }

    #[test]
    fn test_title_truncates_by_characters() {
        let text = "Привет, мир! Это очень длинный текст поста для проверки";
        let title = post(text).title();
        assert_eq!(title.chars().count(), TITLE_LENGTH);
        assert!(text.starts_with(&title));
    }

    #[test]
    fn test_is_authored_by() {
        let post = post("text");
        assert!(post.is_authored_by(7));
        assert!(!post.is_authored_by(8));
    }

    #[test]
    fn test_group_display() {
        let group = Group {
            id: 1,
            title: "Cats".to_string(),
            slug: "cats".to_string(),
            description: String::new(),
        };
        assert_eq!(group.to_string(), "Cats");
    }

    #[test]
    fn test_new_post_builder() {
        let new_post = NewPost::new(3, "Hello").with_group(2).with_image("posts/a.png");
        assert_eq!(new_post.author_id, 3);
        assert_eq!(new_post.group_id, Some(2));
        assert_eq!(new_post.image.as_deref(), Some("posts/a.png"));
    }

    #[test]
    fn test_post_update_empty() {
        assert!(PostUpdate::new().is_empty());
        assert!(!PostUpdate::new().text("x").is_empty());
        assert!(!PostUpdate::new().group(None).is_empty());
        assert_eq!(PostUpdate::new().group(None).group_id, Some(None));
        assert_eq!(PostUpdate::new().image(None).image, Some(None));
    }
}
