//! Database schema and migrations for Yatube.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users (created by the account service or an operator)
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    full_name   TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: community groups
    r#"
CREATE TABLE post_groups (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);
"#,
    // v3: posts; group_id NULL means "no group"
    r#"
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    text        TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    author_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_id    INTEGER REFERENCES post_groups(id) ON DELETE SET NULL,
    image       TEXT
);

CREATE INDEX idx_posts_created_at ON posts(created_at);
CREATE INDEX idx_posts_author_id ON posts(author_id);
CREATE INDEX idx_posts_group_id ON posts(group_id);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_users_migration() {
        let users = MIGRATIONS[0];
        assert!(users.contains("CREATE TABLE users"));
        assert!(users.contains("username    TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_groups_migration_has_unique_slug() {
        let groups = MIGRATIONS[1];
        assert!(groups.contains("CREATE TABLE post_groups"));
        assert!(groups.contains("slug        TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_posts_migration_has_nullable_group() {
        let posts = MIGRATIONS[2];
        assert!(posts.contains("CREATE TABLE posts"));
        assert!(posts.contains("author_id   INTEGER NOT NULL"));
        assert!(posts.contains("group_id    INTEGER REFERENCES"));
        assert!(posts.contains("image       TEXT"));
    }
}
