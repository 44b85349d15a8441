//! PutObject handler
//!
//! Uploads each file with a single streamed PutObject request.
//!
//! # Example
//!
//! ```no_run
//! use s3_upload_action::s3::{Credentials, S3Client, S3ClientConfig};
//! use s3_upload_action::upload::put_object::PutObjectHandler;
//! use s3_upload_action::upload::{UploadHandler, UploadTask};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = S3ClientConfig {
//!     bucket: "my-bucket".to_string(),
//!     region: None,
//!     endpoint: None,
//!     credentials: Credentials::new("access-key", "secret-key"),
//! };
//! let handler = PutObjectHandler::new(S3Client::new(config)?);
//!
//! let task = UploadTask {
//!     path: "dist/hello.txt".into(),
//!     key: "site/hello.txt".to_string(),
//!     content_type: "text/plain".to_string(),
//! };
//! let result = handler.upload(&task).await?;
//! println!("Uploaded to {}", result.location);
//! # Ok(())
//! # }
//! ```

use super::{UploadError, UploadHandler, UploadResult, UploadTask};
use crate::s3::S3Client;
use async_trait::async_trait;
use std::time::Instant;

/// Single-request upload handler backed by an [`S3Client`]
pub struct PutObjectHandler {
    client: S3Client,
}

impl PutObjectHandler {
    /// Create a new PutObject handler
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// The client uploads go through
    pub fn client(&self) -> &S3Client {
        &self.client
    }
}

#[async_trait]
impl UploadHandler for PutObjectHandler {
    #[tracing::instrument(
        name = "upload.put_object",
        skip(self, task),
        fields(
            s3.bucket = %self.client.bucket(),
            s3.key = %task.key,
            http.content_type = %task.content_type
        ),
        err
    )]
    async fn upload(&self, task: &UploadTask) -> Result<UploadResult, UploadError> {
        let start_time = Instant::now();

        let response = self
            .client
            .put_object(&task.key, &task.path, &task.content_type)
            .await?;

        tracing::debug!(
            path = %task.path.display(),
            duration_ms = start_time.elapsed().as_millis(),
            "PutObject upload completed"
        );
        tracing::info!("uploaded - {}", response.key);
        tracing::info!("located - {}", response.location);

        Ok(UploadResult {
            key: response.key,
            location: response.location,
            etag: response.etag,
        })
    }
}
