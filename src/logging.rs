//! Log subscriber setup
//!
//! Events are written to stdout as workflow commands so the runner can
//! annotate them:
//!
//! | Level | Rendered as |
//! |-------|-------------|
//! | ERROR | `::error::<message>` |
//! | WARN | `::warning::<message>` |
//! | INFO | `<message>` |
//! | DEBUG, TRACE | `::debug::<message>` |
//!
//! The level filter comes from an explicit level, then `RUST_LOG`, then
//! `RUNNER_DEBUG=1` (debug), and otherwise defaults to `info`.

use crate::action::escape_data;
use std::fmt;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Logging setup errors
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    FilterError(String),

    #[error("Failed to set global subscriber (may already be initialized): {0}")]
    SubscriberError(String),
}

/// Formats events as workflow commands
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowCommandFormat;

impl<S, N> FormatEvent<S, N> for WorkflowCommandFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let command = match *event.metadata().level() {
            Level::ERROR => Some("error"),
            Level::WARN => Some("warning"),
            Level::INFO => None,
            _ => Some("debug"),
        };

        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        match command {
            // Commands are single-line; escape so multi-line messages survive.
            Some(command) => writeln!(writer, "::{}::{}", command, escape_data(&message)),
            None => writeln!(writer, "{}", message),
        }
    }
}

fn env_filter(level: Option<&str>) -> Result<EnvFilter, LoggingError> {
    if let Some(level) = level {
        return EnvFilter::try_new(level).map_err(|e| LoggingError::FilterError(e.to_string()));
    }

    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if std::env::var("RUNNER_DEBUG").as_deref() == Ok("1") {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    }))
}

/// Install the global subscriber
pub fn init_logging(level: Option<&str>) -> Result<(), LoggingError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .event_format(WorkflowCommandFormat);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError::SubscriberError(e.to_string()))
}
