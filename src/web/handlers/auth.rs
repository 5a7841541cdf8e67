//! Shared handler state and access token issuing.

use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::posts::PostViews;
use crate::web::middleware::JwtClaims;
use crate::{Database, MediaStorage, Result, User, YatubeError};

/// Database shared by all handlers.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: SharedDatabase,
    /// Storage for uploaded images.
    pub media: MediaStorage,
    /// Maximum image upload size in bytes.
    pub max_upload_size: u64,
    /// Hard cap on a request body in bytes.
    pub max_request_size: u64,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: SharedDatabase,
        media: MediaStorage,
        max_upload_size: u64,
        max_request_size: u64,
        jwt_secret: &str,
        access_expiry: u64,
    ) -> Self {
        Self {
            db,
            media,
            max_upload_size,
            max_request_size,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            access_token_expiry: access_expiry,
        }
    }

    /// Page operations bound to this state.
    pub fn views(&self) -> PostViews<'_> {
        PostViews::new(self.db.pool(), &self.media, self.max_upload_size)
    }

    /// Generate an access token for a user.
    ///
    /// There is no login endpoint; operators and tests issue tokens directly.
    pub fn generate_access_token(&self, user: &User) -> Result<String> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user.id,
            username: user.username.clone(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            YatubeError::Auth("failed to generate token".to_string())
        })
    }
}
