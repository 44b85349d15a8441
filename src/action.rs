//! Runner integration
//!
//! Publishes the run outputs through the runner's file command protocol and
//! reports failures.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Environment variable naming the outputs file
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Output holding the destination prefix
pub const OBJECT_KEY_OUTPUT: &str = "object_key";

/// Output holding the JSON list of object locations
pub const OBJECT_LOCATIONS_OUTPUT: &str = "object_locations";

/// Reporter errors
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Failed to write output '{name}': {source}")]
    OutputError {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode output '{name}': {source}")]
    EncodeError {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Output '{0}' contains its own delimiter")]
    DelimiterCollision(String),
}

/// What a successful run publishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputs {
    pub object_key: String,
    pub object_locations: Vec<String>,
}

/// Destination of `set_output` calls
#[derive(Debug, Clone)]
pub struct OutputWriter {
    file: Option<PathBuf>,
}

impl OutputWriter {
    /// Use the outputs file announced by the runner, if any
    pub fn from_env() -> Self {
        Self {
            file: std::env::var_os(OUTPUT_FILE_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Append outputs to a specific file
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
        }
    }

    /// Set a named output.
    ///
    /// Appends a heredoc entry to the outputs file. Without one the legacy
    /// `::set-output` command goes to stdout.
    pub fn set_output(&self, name: &str, value: &str) -> Result<(), ActionError> {
        let io_err = |source: std::io::Error| ActionError::OutputError {
            name: name.to_string(),
            source,
        };

        match self.file {
            Some(ref path) => {
                let entry = heredoc_entry(name, value)?;
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(io_err)?;
                file.write_all(entry.as_bytes()).map_err(io_err)
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(
                    stdout,
                    "::set-output name={}::{}",
                    escape_property(name),
                    escape_data(value)
                )
                .map_err(io_err)
            }
        }
    }
}

fn heredoc_entry(name: &str, value: &str) -> Result<String, ActionError> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(ActionError::DelimiterCollision(name.to_string()));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Escape a workflow command message
pub(crate) fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Log the outcome of a run and publish it as outputs
pub fn report(outputs: &RunOutputs, writer: &OutputWriter) -> Result<(), ActionError> {
    tracing::info!("object key - {}", outputs.object_key);
    tracing::info!(
        "object locations - {}",
        outputs.object_locations.join(",")
    );

    let locations = serde_json::to_string(&outputs.object_locations).map_err(|source| {
        ActionError::EncodeError {
            name: OBJECT_LOCATIONS_OUTPUT.to_string(),
            source,
        }
    })?;

    writer.set_output(OBJECT_KEY_OUTPUT, &outputs.object_key)?;
    writer.set_output(OBJECT_LOCATIONS_OUTPUT, &locations)?;
    Ok(())
}

/// Log a fatal error and return the status the process exits with.
pub fn report_failure(message: impl fmt::Display) -> ExitCode {
    tracing::error!("{}", message);
    ExitCode::FAILURE
}
