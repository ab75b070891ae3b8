//! Batch coordination: concurrent acquisition of a descriptor set.
//!
//! One spawned task per descriptor, with the in-flight count bounded by
//! `fetch.max_concurrent_fetches`. Failures are independent: a sibling's
//! transport error, checksum mismatch or panic never cancels the rest of
//! the batch, and the batch operation itself always completes.

use crate::descriptor::ArtifactDescriptor;
use crate::error::{Error, TransportError};
use crate::fetcher::ArtifactFetcher;
use crate::types::{ArtifactOutcome, BatchReport};
use futures::Stream;
use futures::stream::StreamExt;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

impl ArtifactFetcher {
    /// Acquire every descriptor concurrently, invoking `on_complete` once
    /// per artifact as its outcome becomes known
    ///
    /// The callback receives the verified path on success and `None` on
    /// failure; callers detect missing artifacts by absence. Completion
    /// order across artifacts is unspecified.
    ///
    /// Blocks until all tasks have finished (or the configured batch
    /// deadline has elapsed) and returns the structured per-artifact
    /// report. The call itself never fails, even when every artifact did.
    pub async fn acquire_all<F>(
        &self,
        descriptors: &[ArtifactDescriptor],
        output_dir: &Path,
        mut on_complete: F,
    ) -> BatchReport
    where
        F: FnMut(&ArtifactDescriptor, Option<&Path>),
    {
        let mut stream = self.acquire_stream(descriptors.to_vec(), output_dir.to_path_buf());
        let mut outcomes = Vec::with_capacity(descriptors.len());
        while let Some(outcome) = stream.next().await {
            let path = outcome.result.as_ref().ok().map(|a| a.path.as_path());
            on_complete(&outcome.descriptor, path);
            outcomes.push(outcome);
        }
        BatchReport::new(outcomes)
    }

    /// Stream of per-artifact outcomes in completion order
    ///
    /// Each descriptor runs in its own spawned task so that a panic is
    /// contained at the join boundary and recorded as a failed outcome
    /// rather than tearing down the batch. `buffer_unordered` bounds how
    /// many tasks are in flight at once.
    pub(crate) fn acquire_stream(
        &self,
        descriptors: Vec<ArtifactDescriptor>,
        output_dir: PathBuf,
    ) -> impl Stream<Item = ArtifactOutcome> + Unpin {
        let cancel = CancellationToken::new();
        if let Some(deadline) = self.config().fetch.batch_deadline {
            let deadline_token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                deadline_token.cancel();
            });
        }

        let limit = self.config().fetch.max_concurrent_fetches.max(1);
        let fetcher = self.clone();

        futures::stream::iter(descriptors.into_iter().map(move |descriptor| {
            let fetcher = fetcher.clone();
            let output_dir = output_dir.clone();
            let cancel = cancel.clone();
            async move {
                let coordinate = descriptor.to_string();
                let task = tokio::spawn({
                    let descriptor = descriptor.clone();
                    async move {
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                Err(Error::Transport(TransportError::DeadlineExceeded {
                                    coordinate: descriptor.to_string(),
                                }))
                            }
                            result = fetcher.acquire(&descriptor, &output_dir) => result,
                        }
                    }
                });

                let result = match task.await {
                    Ok(result) => result,
                    Err(join_error) => Err(Error::Transport(TransportError::TaskFailed {
                        coordinate,
                        reason: join_error.to_string(),
                    })),
                };
                ArtifactOutcome { descriptor, result }
            }
        }))
        .buffer_unordered(limit)
    }
}
