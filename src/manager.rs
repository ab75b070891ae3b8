//! Dependency queue management and injection forwarding.

use crate::config::Config;
use crate::descriptor::ArtifactDescriptor;
use crate::error::{Result, ValidationError};
use crate::fetcher::ArtifactFetcher;
use crate::inject::ArtifactInjector;
use crate::types::{ArtifactOutcome, BatchReport, Event};
use futures::stream::StreamExt;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Result of offering a descriptor to the queue
///
/// The original design dropped invalid and duplicate descriptors silently;
/// here the caller is told what happened, while `resolve_all` keeps the
/// fail-silent batch posture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The descriptor was appended to the queue
    Queued,
    /// An equal descriptor (structural equality over all four fields) is
    /// already queued
    Duplicate,
    /// The descriptor has an empty required field
    Rejected(ValidationError),
}

/// Queue contents: insertion-ordered, with a set alongside for O(1)
/// duplicate checks under structural equality
#[derive(Debug, Default)]
struct QueueState {
    order: Vec<ArtifactDescriptor>,
    seen: HashSet<ArtifactDescriptor>,
}

/// Accumulates validated, de-duplicated descriptors and drives batch
/// acquisition, forwarding each verified file to an injection collaborator
///
/// # Examples
///
/// ```no_run
/// use maven_dl::{ArtifactDescriptor, Config, DependencyManager, NoOpInjector};
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let manager = DependencyManager::new(Config::default())?;
///
///     manager.enqueue(ArtifactDescriptor::new("org.slf4j", "slf4j-api", "2.0.13"));
///     manager.enqueue(ArtifactDescriptor::new("com.google.code.gson", "gson", "2.11.0"));
///
///     let report = manager.resolve_all(Path::new("libs"), &NoOpInjector).await;
///     for (descriptor, error) in report.failed() {
///         eprintln!("could not acquire {descriptor}: {error}");
///     }
///     Ok(())
/// }
/// ```
pub struct DependencyManager {
    fetcher: ArtifactFetcher,
    queue: Mutex<QueueState>,
    event_tx: broadcast::Sender<Event>,
}

impl DependencyManager {
    /// Create a manager (and its fetcher) from configuration
    pub fn new(config: Config) -> Result<Self> {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));
        let fetcher = ArtifactFetcher::new(config)?;
        Ok(Self {
            fetcher,
            queue: Mutex::new(QueueState::default()),
            event_tx,
        })
    }

    /// Subscribe to pipeline events
    ///
    /// Events published before the first subscriber exists are dropped;
    /// subscribe before calling [`resolve_all`](Self::resolve_all) to see a
    /// batch's full event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The fetcher backing this manager, for one-off acquisitions
    pub fn fetcher(&self) -> &ArtifactFetcher {
        &self.fetcher
    }

    /// Offer a descriptor to the queue
    ///
    /// Descriptors with an empty `group_id`, `artifact_id` or `version` are
    /// rejected; a descriptor equal to one already queued is reported as a
    /// duplicate and not re-added. Insertion order is preserved.
    pub fn enqueue(&self, descriptor: ArtifactDescriptor) -> EnqueueOutcome {
        if let Err(e) = descriptor.validate() {
            tracing::debug!(artifact = %descriptor, error = %e, "rejecting descriptor");
            return EnqueueOutcome::Rejected(e);
        }

        let mut state = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.seen.contains(&descriptor) {
            tracing::debug!(artifact = %descriptor, "descriptor already queued");
            return EnqueueOutcome::Duplicate;
        }
        state.seen.insert(descriptor.clone());
        state.order.push(descriptor);
        EnqueueOutcome::Queued
    }

    /// Snapshot of the queued descriptors, in insertion order
    pub fn queued(&self) -> Vec<ArtifactDescriptor> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .order
            .clone()
    }

    /// Drain the queue, acquire every artifact concurrently and forward each
    /// verified file to the injector as it completes
    ///
    /// Failed artifacts are simply not offered to the injector; the report
    /// carries their errors. Injection failures are logged and broadcast but
    /// do not change the fetch outcome; the verified file stays on disk.
    pub async fn resolve_all(
        &self,
        output_dir: &Path,
        injector: &dyn ArtifactInjector,
    ) -> BatchReport {
        let batch: Vec<ArtifactDescriptor> = {
            let mut state = self
                .queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.seen.clear();
            std::mem::take(&mut state.order)
        };

        if batch.is_empty() {
            tracing::debug!("resolve_all called with an empty queue");
            return BatchReport::default();
        }

        let total = batch.len();
        tracing::info!(total, output_dir = %output_dir.display(), "resolving artifact batch");
        self.emit(Event::BatchStarted { total });

        let mut stream = self
            .fetcher
            .acquire_stream(batch, output_dir.to_path_buf());
        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = stream.next().await {
            self.handle_outcome(&outcome, injector).await;
            outcomes.push(outcome);
        }

        let report = BatchReport::new(outcomes);
        let succeeded = report.succeeded().count();
        let failed = total - succeeded;
        tracing::info!(total, succeeded, failed, "artifact batch finished");
        self.emit(Event::BatchFinished {
            total,
            succeeded,
            failed,
        });
        report
    }

    /// Publish events for one outcome and forward a success to the injector
    async fn handle_outcome(&self, outcome: &ArtifactOutcome, injector: &dyn ArtifactInjector) {
        match &outcome.result {
            Ok(artifact) => {
                self.emit(Event::FetchCompleted {
                    descriptor: artifact.descriptor.clone(),
                    path: artifact.path.clone(),
                    source: artifact.source,
                });
                match injector.inject(&artifact.descriptor, &artifact.path).await {
                    Ok(()) => {
                        tracing::debug!(
                            artifact = %artifact.descriptor,
                            path = %artifact.path.display(),
                            "artifact injected"
                        );
                        self.emit(Event::ArtifactInjected {
                            descriptor: artifact.descriptor.clone(),
                            path: artifact.path.clone(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(
                            artifact = %artifact.descriptor,
                            error = %e,
                            "injection collaborator rejected artifact"
                        );
                        self.emit(Event::InjectionFailed {
                            descriptor: artifact.descriptor.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    artifact = %outcome.descriptor,
                    error = %e,
                    kind = e.kind(),
                    "artifact acquisition failed"
                );
                self.emit(Event::FetchFailed {
                    descriptor: outcome.descriptor.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    fn emit(&self, event: Event) {
        // A send error just means no subscriber is currently listening
        self.event_tx.send(event).ok();
    }
}
