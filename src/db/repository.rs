//! User repository for Yatube.

use super::user::{NewUser, User};
use super::DbPool;
use crate::{Result, YatubeError};

/// Repository for user lookups.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// Used by operators and test fixtures; the web handlers never create users.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO users (username, full_name) VALUES (?, ?) RETURNING id")
                .bind(&new_user.username)
                .bind(&new_user.full_name)
                .fetch_one(self.pool)
                .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| YatubeError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, full_name, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Get a user by username (exact match).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, full_name, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
