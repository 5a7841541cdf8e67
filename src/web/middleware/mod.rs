//! Middleware for the web layer.

pub mod auth;
pub mod cors;

pub use auth::{jwt_auth, JwtClaims, JwtState, LoginRequired, ACCESS_TOKEN_COOKIE};
pub use cors::create_cors_layer;
