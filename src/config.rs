//! Configuration module for Yatube.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, YatubeError};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/yatube.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Uploaded media configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory that receives uploaded images.
    #[serde(default = "default_media_root")]
    pub root: String,
    /// URL prefix under which the media directory is served.
    #[serde(default = "default_media_url")]
    pub url: String,
    /// Maximum image size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Hard cap on a request body in megabytes.
    #[serde(default = "default_max_request_size")]
    pub max_request_size_mb: u64,
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_media_url() -> String {
    "/media".to_string()
}

fn default_max_upload_size() -> u64 {
    5
}

fn default_max_request_size() -> u64 {
    50
}

impl MediaConfig {
    /// Maximum image size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }

    /// Hard cap on a request body in bytes.
    pub fn max_request_size_bytes(&self) -> u64 {
        self.max_request_size_mb * 1024 * 1024
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            url: default_media_url(),
            max_upload_size_mb: default_max_upload_size(),
            max_request_size_mb: default_max_request_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/yatube.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret used to verify access tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_jwt_access_expiry")]
    pub jwt_access_token_expiry_secs: u64,
    /// Where anonymous visitors are sent when a page needs a login.
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8000
}

fn default_jwt_access_expiry() -> u64 {
    3600 // 1 hour
}

fn default_login_url() -> String {
    "/auth/login/".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
            jwt_access_token_expiry_secs: default_jwt_access_expiry(),
            login_url: default_login_url(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Uploaded media configuration.
    #[serde(default)]
    pub media: MediaConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(YatubeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| YatubeError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `YATUBE_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("YATUBE_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.web.jwt_secret = jwt_secret;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(YatubeError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via YATUBE_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.media.max_upload_size_mb == 0 {
            return Err(YatubeError::Config(
                "media.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.media.max_request_size_mb <= self.media.max_upload_size_mb {
            return Err(YatubeError::Config(
                "media.max_request_size_mb must be greater than media.max_upload_size_mb"
                    .to_string(),
            ));
        }
        if !self.media.url.starts_with('/') {
            return Err(YatubeError::Config(format!(
                "media.url must start with '/': {}",
                self.media.url
            )));
        }
        Ok(())
    }
}
