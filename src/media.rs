//! Storage for uploaded post images.
//!
//! Files live under `<root>/posts/` and are referred to by their path
//! relative to the media root (e.g. `posts/small.gif`); that reference is
//! what the `posts.image` column stores.

use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::{Result, YatubeError};

/// Directory under the media root holding post images.
pub const POSTS_DIR: &str = "posts";

const FALLBACK_NAME: &str = "upload";
const MAX_ATTEMPTS: usize = 100;

/// Filesystem storage rooted at the configured media directory.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Open the storage, creating `<root>/posts` when missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(POSTS_DIR))?;
        Ok(Self { root })
    }

    /// The media root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save an uploaded file and return its reference.
    ///
    /// The client file name is sanitized; when the name is taken, a short
    /// random suffix is appended to the stem (`cat_1a2b3c4.gif`).
    pub fn save(&self, data: &[u8], original_name: &str) -> Result<String> {
        let name = sanitize_file_name(original_name);

        for attempt in 0..MAX_ATTEMPTS {
            let candidate = if attempt == 0 {
                name.clone()
            } else {
                with_suffix(&name)
            };
            let reference = format!("{}/{}", POSTS_DIR, candidate);
            let path = self.root.join(&reference);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(data)?;
                    debug!("Stored {} bytes as {}", data.len(), reference);
                    return Ok(reference);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(YatubeError::Validation(format!(
            "could not find a free file name for {}",
            name
        )))
    }

    /// Absolute path of a stored reference.
    ///
    /// References that leave the posts directory are rejected.
    pub fn path_of(&self, reference: &str) -> Result<PathBuf> {
        let relative = Path::new(reference);
        let mut components = relative.components();

        let in_posts = components.next() == Some(Component::Normal(OsStr::new(POSTS_DIR)));
        let plain = components.clone().count() > 0
            && components.all(|c| matches!(c, Component::Normal(_)));

        if !in_posts || !plain {
            return Err(YatubeError::Validation(format!(
                "invalid media reference: {}",
                reference
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Check whether a stored file exists.
    pub fn exists(&self, reference: &str) -> bool {
        self.path_of(reference).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Delete a stored file. A missing file is not an error.
    pub fn delete(&self, reference: &str) -> Result<()> {
        let path = self.path_of(reference)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted {}", reference);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Media file already gone: {}", reference);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduce a client-supplied file name to a safe single path component.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

fn with_suffix(name: &str) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    let suffix = &token[..7];

    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", name, suffix),
    }
}
