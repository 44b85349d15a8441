//! Upload module
//!
//! Pairs every enumerated file with its destination key and content type,
//! and pushes the resulting tasks through an [`UploadHandler`].

use crate::config::DestinationPrefix;
use crate::s3::S3ClientError;
use crate::source::{key, FileEntry};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod executor;
pub mod put_object;

pub use executor::upload_all;

/// Content type used when the extension is unknown
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("S3 error: {0}")]
    S3Error(#[from] S3ClientError),

    #[error("{failed} of {total} uploads failed, first failure for '{key}': {source}")]
    Incomplete {
        failed: usize,
        total: usize,
        key: String,
        #[source]
        source: Box<UploadError>,
    },
}

/// One file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub path: PathBuf,
    pub key: String,
    pub content_type: String,
}

impl UploadTask {
    /// Build the task for a file under the given prefix
    pub fn new(entry: &FileEntry, prefix: &DestinationPrefix) -> Self {
        Self {
            key: key::object_key(prefix.as_str(), &entry.relative),
            content_type: content_type(&entry.path).to_string(),
            path: entry.path.clone(),
        }
    }
}

/// Upload result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub key: String,
    pub location: String,
    pub etag: Option<String>,
}

/// Upload handler trait
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UploadHandler: Send + Sync {
    /// Upload a single file
    async fn upload(&self, task: &UploadTask) -> Result<UploadResult, UploadError>;
}

/// MIME type for a file, guessed from its extension
pub fn content_type(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
