//! Handlers for the web layer.

pub mod auth;
pub mod posts;

pub use auth::*;
pub use posts::*;
