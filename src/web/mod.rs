//! Web module for Yatube.
//!
//! This module serves the site's pages over HTTP: routing, authentication,
//! form extraction and the JSON rendering of page outcomes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
