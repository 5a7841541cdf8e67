//! Web server for Yatube.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::{MediaStorage, Result, YatubeError};

use super::handlers::{AppState, SharedDatabase};
use super::middleware::JwtState;
use super::router::{create_health_router, create_media_router, create_router};

/// Web server for the site.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
    /// Media root directory.
    media_root: PathBuf,
    /// URL prefix media is served under.
    media_url: String,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: SharedDatabase) -> Result<Self> {
        let web = &config.web;
        let addr = format!("{}:{}", web.host, web.port)
            .parse()
            .map_err(|e| YatubeError::Config(format!("invalid web server address: {}", e)))?;

        let media = MediaStorage::new(&config.media.root)?;
        tracing::info!("Media storage initialized at: {}", config.media.root);

        let app_state = AppState::new(
            db,
            media,
            config.media.max_upload_size_bytes(),
            config.media.max_request_size_bytes(),
            &web.jwt_secret,
            web.jwt_access_token_expiry_secs,
        );
        let jwt_state = Arc::new(JwtState::new(&web.jwt_secret, web.login_url.clone()));

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            jwt_state,
            cors_origins: web.cors_origins.clone(),
            media_root: PathBuf::from(&config.media.root),
            media_url: config.media.url.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the application state.
    pub fn app_state(&self) -> &Arc<AppState> {
        &self.app_state
    }

    fn into_router(self) -> Router {
        let mut router = create_router(self.app_state, self.jwt_state, &self.cors_origins)
            .merge(create_health_router());

        if let Some(media_router) = create_media_router(&self.media_root, &self.media_url) {
            router = router.merge(media_router);
        }

        // Add gzip compression layer
        router.layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
