//! JWT authentication middleware.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, LOCATION},
        request::Parts,
        Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::posts::Requester;
use crate::web::error::ApiError;

/// Cookie carrying the access token for browser clients.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: i64,
    /// Username.
    pub username: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

impl JwtClaims {
    /// The requester these claims identify.
    pub fn requester(&self) -> Requester {
        Requester {
            user_id: self.sub,
            username: self.username.clone(),
        }
    }
}

/// Application state for JWT authentication.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
    /// Where unauthenticated visitors of protected pages are sent.
    pub login_url: String,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str, login_url: impl Into<String>) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
            login_url: login_url.into(),
        }
    }

    /// Decode a token, returning its claims when valid.
    pub fn verify(&self, token: &str) -> Option<JwtClaims> {
        match decode::<JwtClaims>(token, &self.decoding_key, &self.validation) {
            Ok(token_data) => Some(token_data.claims),
            Err(e) => {
                tracing::debug!("JWT validation failed: {}", e);
                None
            }
        }
    }

    /// Login URL carrying `next` so the visitor can come back.
    pub fn login_redirect(&self, next: &str) -> String {
        format!("{}?next={}", self.login_url, urlencoding::encode(next))
    }
}

/// Find the access token: `Authorization: Bearer` header first, then cookie.
fn bearer_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    from_header.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

fn claims_from_parts(parts: &Parts) -> Option<JwtClaims> {
    let jwt_state = parts.extensions.get::<Arc<JwtState>>()?;
    let token = bearer_token(parts)?;
    jwt_state.verify(&token)
}

/// Extractor for pages that need a logged-in author.
///
/// Anonymous visitors are redirected to the login page with `next` set to
/// the requested path.
#[derive(Debug, Clone)]
pub struct LoginRequired(pub Requester);

#[async_trait]
impl<S> FromRequestParts<S> for LoginRequired
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jwt_state = parts
            .extensions
            .get::<Arc<JwtState>>()
            .cloned()
            .ok_or_else(|| ApiError::internal("JWT state not configured").into_response())?;

        if let Some(claims) = claims_from_parts(parts) {
            return Ok(LoginRequired(claims.requester()));
        }

        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        tracing::debug!("Anonymous request to {}; redirecting to login", next);

        Err((
            StatusCode::FOUND,
            [(LOCATION, jwt_state.login_redirect(next))],
        )
            .into_response())
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
