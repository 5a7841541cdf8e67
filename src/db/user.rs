//! User model for Yatube.

use serde::Serialize;

use super::Entity;

/// A registered author.
///
/// Accounts are managed outside this application; posts only refer to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique).
    pub username: String,
    /// Full name shown on the profile page (may be empty).
    pub full_name: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Name to display: the full name, or the username when none is set.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "user";
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Full name (defaults to empty).
    pub full_name: String,
}

impl NewUser {
    /// Create a new user with just a username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: String::new(),
        }
    }

    /// Set the full name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }
}
