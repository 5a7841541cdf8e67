//! Post repository for Yatube.
//!
//! Posts are always read joined with their author and (optional) group, and
//! listed newest first.

use sqlx::{QueryBuilder, Sqlite};

use super::paginator::{Page, Paginator, POSTS_PER_PAGE};
use super::types::{NewPost, Post, PostUpdate};
use crate::db::DbPool;
use crate::{Result, YatubeError};

const POST_COLUMNS: &str = "SELECT p.id, p.text, p.created_at, p.author_id, \
     u.username AS author_username, p.group_id, g.slug AS group_slug, \
     g.title AS group_title, p.image";

const POST_FROM: &str = " FROM posts p \
     JOIN users u ON u.id = p.author_id \
     LEFT JOIN post_groups g ON g.id = p.group_id";

const NEWEST_FIRST: &str = " ORDER BY p.created_at DESC, p.id DESC";

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// Every post.
    All,
    /// Posts filed under the group with this ID.
    Group(i64),
    /// Posts written by the user with this ID.
    Author(i64),
}

impl PostScope {
    fn push_filter(self, query: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            PostScope::All => {}
            PostScope::Group(group_id) => {
                query.push(" WHERE p.group_id = ");
                query.push_bind(group_id);
            }
            PostScope::Author(author_id) => {
                query.push(" WHERE p.author_id = ");
                query.push_bind(author_id);
            }
        }
    }
}

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID and creation time.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (text, author_id, group_id, image) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&new_post.text)
        .bind(new_post.author_id)
        .bind(new_post.group_id)
        .bind(&new_post.image)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| YatubeError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("{POST_COLUMNS}{POST_FROM} WHERE p.id = ?");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// Update a post by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated post, or None if not found.
    pub async fn update(&self, id: i64, update: &PostUpdate) -> Result<Option<Post>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE posts SET ");
        let mut separated = query.separated(", ");

        if let Some(ref text) = update.text {
            separated.push("text = ");
            separated.push_bind_unseparated(text.clone());
        }
        if let Some(group_id) = update.group_id {
            separated.push("group_id = ");
            separated.push_bind_unseparated(group_id);
        }
        if let Some(ref image) = update.image {
            separated.push("image = ");
            separated.push_bind_unseparated(image.clone());
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Count the posts in a scope.
    pub async fn count(&self, scope: PostScope) -> Result<u64> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        scope.push_filter(&mut query);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    /// List posts in a scope, newest first.
    pub async fn list(&self, scope: PostScope, offset: u64, limit: u32) -> Result<Vec<Post>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(POST_COLUMNS);
        query.push(POST_FROM);
        scope.push_filter(&mut query);
        query.push(NEWEST_FIRST);
        query.push(" LIMIT ");
        query.push_bind(i64::from(limit));
        query.push(" OFFSET ");
        query.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let posts = query.build_query_as::<Post>().fetch_all(self.pool).await?;
        Ok(posts)
    }

    /// Fetch one listing page of the scope.
    ///
    /// `requested` is the raw page number from the query string; see
    /// [`Paginator::page_number`] for how it is resolved.
    pub async fn page(&self, scope: PostScope, requested: Option<&str>) -> Result<Page<Post>> {
        let paginator = Paginator::new(self.count(scope).await?, POSTS_PER_PAGE);
        let number = paginator.page_number(requested);
        let posts = self
            .list(scope, paginator.offset(number), paginator.per_page())
            .await?;
        Ok(paginator.page(number, posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::posts::{GroupRepository, NewGroup};
    use crate::Database;

    struct Fixture {
        db: Database,
        author_id: i64,
        other_id: i64,
        group_id: i64,
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let author_id = users.create(&NewUser::new("leo")).await.unwrap().id;
        let other_id = users.create(&NewUser::new("anna")).await.unwrap().id;
        let group_id = GroupRepository::new(db.pool())
            .create(&NewGroup::new("Cats", "cats"))
            .await
            .unwrap()
            .id;

        Fixture {
            db,
            author_id,
            other_id,
            group_id,
        }
    }

    #[tokio::test]
    async fn test_create_post() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());

        let post = repo
            .create(&NewPost::new(fx.author_id, "Hello").with_group(fx.group_id))
            .await
            .unwrap();

        assert_eq!(post.text, "Hello");
        assert_eq!(post.author_username, "leo");
        assert_eq!(post.group_id, Some(fx.group_id));
        assert_eq!(post.group_slug.as_deref(), Some("cats"));
        assert_eq!(post.group_title.as_deref(), Some("Cats"));
        assert!(post.image.is_none());
        assert!(!post.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_without_group() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());

        let post = repo.create(&NewPost::new(fx.author_id, "Hi")).await.unwrap();

        assert!(post.group_id.is_none());
        assert!(post.group_slug.is_none());
    }

    #[tokio::test]
    async fn test_create_post_unknown_author() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());

        let result = repo.create(&NewPost::new(999, "Orphan")).await;
        assert!(matches!(result, Err(YatubeError::Database(_))));
        assert_eq!(repo.count(PostScope::All).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_post() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());
        let post = repo
            .create(&NewPost::new(fx.author_id, "Old").with_group(fx.group_id))
            .await
            .unwrap();

        let updated = repo
            .update(
                post.id,
                &PostUpdate::new()
                    .text("New")
                    .group(None)
                    .image(Some("posts/a.png".to_string())),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.text, "New");
        assert!(updated.group_id.is_none());
        assert_eq!(updated.image.as_deref(), Some("posts/a.png"));
        assert_eq!(updated.author_id, fx.author_id);
        assert_eq!(updated.created_at, post.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());

        let result = repo.update(42, &PostUpdate::new().text("x")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_update_returns_post() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());
        let post = repo.create(&NewPost::new(fx.author_id, "Same")).await.unwrap();

        let same = repo.update(post.id, &PostUpdate::new()).await.unwrap();
        assert_eq!(same, Some(post));
    }

    #[tokio::test]
    async fn test_count_by_scope() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());

        repo.create(&NewPost::new(fx.author_id, "a").with_group(fx.group_id))
            .await
            .unwrap();
        repo.create(&NewPost::new(fx.author_id, "b")).await.unwrap();
        repo.create(&NewPost::new(fx.other_id, "c")).await.unwrap();

        assert_eq!(repo.count(PostScope::All).await.unwrap(), 3);
        assert_eq!(repo.count(PostScope::Group(fx.group_id)).await.unwrap(), 1);
        assert_eq!(repo.count(PostScope::Author(fx.author_id)).await.unwrap(), 2);
        assert_eq!(repo.count(PostScope::Author(fx.other_id)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());

        for text in ["first", "second", "third"] {
            repo.create(&NewPost::new(fx.author_id, text)).await.unwrap();
        }

        let texts: Vec<String> = repo
            .list(PostScope::All, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["third", "second", "first"]);

        let tail = repo.list(PostScope::All, 2, 10).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].text, "first");
    }

    #[tokio::test]
    async fn test_page_of_thirteen() {
        let fx = setup().await;
        let repo = PostRepository::new(fx.db.pool());

        for i in 0..13 {
            repo.create(&NewPost::new(fx.author_id, format!("post {i}")).with_group(fx.group_id))
                .await
                .unwrap();
        }

        let first = repo.page(PostScope::Group(fx.group_id), None).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first.count, 13);
        assert_eq!(first.object_list[0].text, "post 12");

        let second = repo
            .page(PostScope::Group(fx.group_id), Some("2"))
            .await
            .unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(second.object_list[2].text, "post 0");

        let clamped = repo.page(PostScope::All, Some("50")).await.unwrap();
        assert_eq!(clamped.number, 2);
        assert_eq!(clamped.len(), 3);

        let other = repo
            .page(PostScope::Author(fx.other_id), None)
            .await
            .unwrap();
        assert!(other.is_empty());
        assert_eq!(other.num_pages, 1);
    }
}
