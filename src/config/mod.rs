//! Configuration module for the upload action
//!
//! Resolves the raw action inputs into an immutable [`Config`] that is built
//! once at start-up and handed to every other component by reference.

use crate::s3::Credentials;
use crate::source::SourceSpec;
use std::fmt;
use thiserror::Error;

mod inputs;

pub use inputs::ActionInputs;
use inputs::normalized;

/// Destination value that asks for a generated prefix
pub const RANDOM_PREFIX_MARKER: &str = "/";

/// Length of a generated destination prefix
const RANDOM_PREFIX_LEN: usize = 12;

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Key prefix shared by every object uploaded in one run.
///
/// Resolved exactly once; a configured value of `/` is replaced by a fresh
/// random identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPrefix(String);

impl DestinationPrefix {
    /// Resolve the configured `destination_dir` value
    pub fn resolve(configured: Option<&str>) -> Self {
        match configured {
            Some(RANDOM_PREFIX_MARKER) => Self(generate_id()),
            Some(value) => Self(value.to_string()),
            None => Self(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn generate_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(RANDOM_PREFIX_LEN);
    id
}

/// Resolved action configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub source: SourceSpec,
    pub destination: DestinationPrefix,
}

impl Config {
    /// Build the configuration from action inputs.
    ///
    /// Fails on the first missing required input, before anything touches
    /// the file system.
    pub fn from_inputs(inputs: &ActionInputs) -> Result<Self, ConfigError> {
        let access_key = require(&inputs.aws_key_id, "aws_key_id")?;
        let secret_key = require(&inputs.aws_secret_access_key, "aws_secret_access_key")?;
        let bucket = require(&inputs.aws_bucket, "aws_bucket")?;

        let config = Self {
            credentials: Credentials::new(access_key, secret_key),
            bucket: bucket.to_string(),
            region: normalized(&inputs.aws_region).map(str::to_string),
            endpoint: normalized(&inputs.endpoint).map(str::to_string),
            source: SourceSpec::from_inputs(
                normalized(&inputs.source_dir),
                normalized(&inputs.source_files),
            ),
            destination: DestinationPrefix::resolve(normalized(&inputs.destination_dir)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref endpoint) = self.endpoint {
            if !is_valid_http_url(endpoint) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid endpoint '{}': must start with http:// or https://",
                    endpoint
                )));
            }
        }

        Ok(())
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    normalized(value).ok_or(ConfigError::MissingInput(name))
}
