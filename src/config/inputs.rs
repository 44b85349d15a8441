//! Action inputs
//!
//! The runner passes `with:` inputs as `INPUT_<NAME>` environment variables.
//! Each input can also be given as a command line flag, which takes
//! precedence over the environment.

use clap::Args;

/// Raw, unvalidated action inputs
#[derive(Args, Debug, Clone, Default)]
pub struct ActionInputs {
    /// Access key ID for the storage backend
    #[arg(long, env = "INPUT_AWS_KEY_ID", hide_env_values = true)]
    pub aws_key_id: Option<String>,

    /// Secret access key for the storage backend
    #[arg(long, env = "INPUT_AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_access_key: Option<String>,

    /// Destination bucket name
    #[arg(long, env = "INPUT_AWS_BUCKET")]
    pub aws_bucket: Option<String>,

    /// Region of the bucket
    #[arg(long, env = "INPUT_AWS_REGION")]
    pub aws_region: Option<String>,

    /// Directory whose files are uploaded recursively
    #[arg(long, env = "INPUT_SOURCE_DIR")]
    pub source_dir: Option<String>,

    /// Newline separated glob patterns of files to upload
    #[arg(long, env = "INPUT_SOURCE_FILES")]
    pub source_files: Option<String>,

    /// Key prefix for uploaded objects, `/` for a random one
    #[arg(long, env = "INPUT_DESTINATION_DIR")]
    pub destination_dir: Option<String>,

    /// Custom endpoint for S3-compatible backends
    #[arg(long, env = "INPUT_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// Trim an input; whitespace-only values count as unset.
pub(crate) fn normalized(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
