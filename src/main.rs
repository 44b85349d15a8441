//! S3 Upload Action - upload files from a CI job to an S3 bucket
//!
//! Inputs arrive as `INPUT_*` environment variables or flags; outputs are
//! appended to the runner's outputs file.

use clap::Parser;
use s3_upload_action::action::{self, OutputWriter};
use s3_upload_action::config::{ActionInputs, Config};
use s3_upload_action::logging;
use s3_upload_action::s3::{S3Client, S3ClientConfig};
use s3_upload_action::upload::put_object::PutObjectHandler;
use std::process::ExitCode;
use tracing::info;

/// S3 Upload Action - upload a directory or glob-matched files to S3
#[derive(Parser, Debug)]
#[command(name = "s3-upload-action")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    inputs: ActionInputs,

    /// Log level or filter (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(args.log_level.as_deref()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match execute(&args.inputs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => action::report_failure(&e),
    }
}

async fn execute(inputs: &ActionInputs) -> anyhow::Result<()> {
    let config = Config::from_inputs(inputs)?;
    info!(
        "Starting s3-upload-action v{} for bucket '{}'",
        s3_upload_action::VERSION,
        config.bucket
    );

    let client = S3Client::new(S3ClientConfig::from(&config))?;
    let handler = PutObjectHandler::new(client);

    let outputs = s3_upload_action::run(&config, &handler).await?;
    action::report(&outputs, &OutputWriter::from_env())?;

    Ok(())
}
