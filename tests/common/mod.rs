//! Test helpers for the HTTP-level tests.
//!
//! Provides a [`TestApp`] wrapping an `axum_test::TestServer` over an
//! in-memory database and a temporary media root.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;

use yatube::config::Config;
use yatube::web::handlers::AppState;
use yatube::web::middleware::JwtState;
use yatube::web::router::{create_health_router, create_media_router, create_router};
use yatube::{
    Database, Group, GroupRepository, MediaStorage, NewGroup, NewPost, NewUser, Post,
    PostRepository, PostScope, User, UserRepository,
};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";
pub const LOGIN_URL: &str = "/auth/login/";

/// A 1x1 GIF.
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00,
    0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

/// A running application with helpers for seeding data.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    _media_dir: TempDir,
}

impl TestApp {
    /// Create a test app with an empty database.
    pub async fn new() -> Self {
        let media_dir = TempDir::new().expect("Failed to create media dir");

        let mut config = Config::default();
        config.web.jwt_secret = JWT_SECRET.to_string();
        config.web.login_url = LOGIN_URL.to_string();

        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let media = MediaStorage::new(media_dir.path()).expect("Failed to create media storage");

        let state = Arc::new(AppState::new(
            Arc::new(db),
            media,
            config.media.max_upload_size_bytes(),
            config.media.max_request_size_bytes(),
            &config.web.jwt_secret,
            config.web.jwt_access_token_expiry_secs,
        ));
        let jwt_state = Arc::new(JwtState::new(&config.web.jwt_secret, LOGIN_URL));

        let router = create_router(state.clone(), jwt_state, &config.web.cors_origins)
            .merge(create_health_router())
            .merge(
                create_media_router(media_dir.path(), &config.media.url)
                    .expect("Failed to create media router"),
            );

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            _media_dir: media_dir,
        }
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub async fn create_user(&self, username: &str) -> User {
        UserRepository::new(self.db().pool())
            .create(&NewUser::new(username))
            .await
            .expect("Failed to create user")
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> Group {
        GroupRepository::new(self.db().pool())
            .create(&NewGroup::new(title, slug).with_description("Test group"))
            .await
            .expect("Failed to create group")
    }

    pub async fn create_post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let mut new_post = NewPost::new(author.id, text);
        if let Some(group) = group {
            new_post = new_post.with_group(group.id);
        }
        PostRepository::new(self.db().pool())
            .create(&new_post)
            .await
            .expect("Failed to create post")
    }

    pub async fn get_post(&self, id: i64) -> Option<Post> {
        PostRepository::new(self.db().pool())
            .get_by_id(id)
            .await
            .expect("Failed to get post")
    }

    pub async fn post_count(&self) -> u64 {
        PostRepository::new(self.db().pool())
            .count(PostScope::All)
            .await
            .expect("Failed to count posts")
    }

    /// Access token for a user.
    pub fn token_for(&self, user: &User) -> String {
        self.state
            .generate_access_token(user)
            .expect("Failed to generate token")
    }

    /// `Authorization` header value for a user.
    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", self.token_for(user))
    }
}
