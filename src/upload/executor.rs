//! Concurrent upload execution
//!
//! Every task is started at once and awaited together. Results come back in
//! submission order regardless of completion order, and a failing upload
//! never cancels the others.

use super::{UploadError, UploadHandler, UploadResult, UploadTask};
use futures::future::join_all;

/// Upload all tasks concurrently.
///
/// Each failure is logged as it is observed. Once every task has settled
/// the first failure, in submission order, fails the whole batch.
#[tracing::instrument(name = "upload.all", skip_all, fields(tasks = tasks.len()))]
pub async fn upload_all<H>(handler: &H, tasks: &[UploadTask]) -> Result<Vec<UploadResult>, UploadError>
where
    H: UploadHandler + ?Sized,
{
    let outcomes = join_all(tasks.iter().map(|task| handler.upload(task))).await;

    let total = outcomes.len();
    let mut results = Vec::with_capacity(total);
    let mut failed = 0usize;
    let mut first_failure = None;

    for (task, outcome) in tasks.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                failed += 1;
                tracing::error!(path = %task.path.display(), "failed to upload {}: {}", task.key, e);
                if first_failure.is_none() {
                    first_failure = Some((task.key.clone(), e));
                }
            }
        }
    }

    match first_failure {
        Some((key, source)) => Err(UploadError::Incomplete {
            failed,
            total,
            key,
            source: Box::new(source),
        }),
        None => Ok(results),
    }
}
