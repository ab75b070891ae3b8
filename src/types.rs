//! Core types and events for maven-dl

use crate::descriptor::ArtifactDescriptor;
use crate::error::Error;
use serde::Serialize;
use std::path::PathBuf;

/// Where a verified artifact came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    /// A pre-existing local file passed verification; no body download occurred
    Cache,
    /// The artifact body was downloaded in this acquisition
    Downloaded,
}

/// A verified local artifact, ready for injection
///
/// Ownership of the file transfers to the caller once this value is
/// produced; the fetcher no longer touches it.
#[derive(Clone, Debug)]
pub struct FetchedArtifact {
    /// The descriptor this artifact was resolved from
    pub descriptor: ArtifactDescriptor,
    /// Path of the verified local file
    pub path: PathBuf,
    /// Whether the file came from cache or was downloaded
    pub source: FetchSource,
    /// The SHA-1 digest that matched the published sidecar (lowercase hex)
    pub sha1: String,
}

/// The result of acquiring one artifact within a batch
#[derive(Debug)]
pub struct ArtifactOutcome {
    /// The descriptor this outcome belongs to
    pub descriptor: ArtifactDescriptor,
    /// The verified artifact, or why acquisition failed
    pub result: Result<FetchedArtifact, Error>,
}

/// Structured per-artifact results of one batch acquisition
///
/// A batch operation always completes and always yields a report; "every
/// artifact failed" is still a successfully-run batch. Callers that need to
/// distinguish failure kinds inspect the individual outcomes.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<ArtifactOutcome>,
}

impl BatchReport {
    pub(crate) fn new(outcomes: Vec<ArtifactOutcome>) -> Self {
        Self { outcomes }
    }

    /// All per-artifact outcomes, in completion order
    pub fn outcomes(&self) -> &[ArtifactOutcome] {
        &self.outcomes
    }

    /// The verified artifacts
    pub fn succeeded(&self) -> impl Iterator<Item = &FetchedArtifact> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// The failed descriptors with their errors
    pub fn failed(&self) -> impl Iterator<Item = (&ArtifactDescriptor, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.descriptor, e)))
    }

    /// Look up the outcome for a specific descriptor
    pub fn outcome_for(&self, descriptor: &ArtifactDescriptor) -> Option<&ArtifactOutcome> {
        self.outcomes.iter().find(|o| &o.descriptor == descriptor)
    }

    /// Number of artifacts in the batch
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the batch was empty
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Whether every artifact in the batch was verified
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Pipeline events broadcast by [`crate::DependencyManager`]
///
/// Consumers subscribe via [`crate::DependencyManager::subscribe`]; no
/// polling required. Slow subscribers may observe lagged receives, never
/// blocked senders.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A batch resolution started
    BatchStarted {
        /// Number of descriptors in the batch
        total: usize,
    },
    /// One artifact was fetched and verified
    FetchCompleted {
        /// The artifact that completed
        descriptor: ArtifactDescriptor,
        /// The verified local path
        path: PathBuf,
        /// Cache hit or fresh download
        source: FetchSource,
    },
    /// One artifact failed acquisition or verification
    FetchFailed {
        /// The artifact that failed
        descriptor: ArtifactDescriptor,
        /// Rendered error message
        error: String,
    },
    /// The injection collaborator accepted a verified artifact
    ArtifactInjected {
        /// The injected artifact
        descriptor: ArtifactDescriptor,
        /// The path handed to the collaborator
        path: PathBuf,
    },
    /// The injection collaborator rejected a verified artifact
    InjectionFailed {
        /// The artifact whose injection failed
        descriptor: ArtifactDescriptor,
        /// Rendered error message
        error: String,
    },
    /// A batch resolution finished
    BatchFinished {
        /// Number of descriptors in the batch
        total: usize,
        /// How many were verified
        succeeded: usize,
        /// How many failed
        failed: usize,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TransportError, ValidationError};

    fn sample_outcome(version: &str, ok: bool) -> ArtifactOutcome {
        let descriptor = ArtifactDescriptor::new("org.example", "lib", version);
        let result = if ok {
            Ok(FetchedArtifact {
                descriptor: descriptor.clone(),
                path: PathBuf::from(format!("/libs/lib-{version}.jar")),
                source: FetchSource::Downloaded,
                sha1: "da39a3ee5e6b4b0d3255bfef95601890afd80709".into(),
            })
        } else {
            Err(Error::Transport(TransportError::HttpStatus {
                url: "https://repo.example/lib.jar".into(),
                status: 404,
            }))
        };
        ArtifactOutcome { descriptor, result }
    }

    #[test]
    fn report_partitions_successes_and_failures() {
        let report = BatchReport::new(vec![
            sample_outcome("1.0.0", true),
            sample_outcome("1.0.1", false),
            sample_outcome("1.0.2", true),
        ]);

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded().count(), 2);
        assert_eq!(report.failed().count(), 1);
        assert!(!report.all_succeeded());

        let (descriptor, error) = report.failed().next().unwrap();
        assert_eq!(descriptor.version(), "1.0.1");
        assert_eq!(error.kind(), "http_status");
    }

    #[test]
    fn outcome_for_finds_by_structural_equality() {
        let report = BatchReport::new(vec![sample_outcome("1.0.0", true)]);
        let probe = ArtifactDescriptor::new("org.example", "lib", "1.0.0");
        assert!(report.outcome_for(&probe).is_some());

        let miss = ArtifactDescriptor::new("org.example", "lib", "9.9.9");
        assert!(report.outcome_for(&miss).is_none());
    }

    #[test]
    fn empty_report_trivially_succeeds() {
        let report = BatchReport::default();
        assert!(report.is_empty());
        assert!(report.all_succeeded());
    }

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let event = Event::FetchFailed {
            descriptor: ArtifactDescriptor::new("org.example", "lib", "1.0.0"),
            error: Error::Validation(ValidationError::EmptyField { field: "version" }).to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "fetch_failed");
        assert_eq!(json["descriptor"]["artifact_id"], "lib");
    }
}
