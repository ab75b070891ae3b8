//! # maven-dl
//!
//! Embeddable Maven artifact acquisition library for plugin runtimes.
//!
//! Hosts that load third-party jars at startup (plugin servers, extension
//! runtimes) queue artifact descriptors, and maven-dl turns them into
//! checksum-verified local files handed to a pluggable injection
//! collaborator. There is no transitive resolution and no version
//! negotiation: every descriptor is resolved, fetched and verified
//! independently and concurrently.
//!
//! ## Design Philosophy
//!
//! maven-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Fail-closed** - An artifact that cannot be verified against its
//!   published SHA-1 sidecar is deleted, never loaded
//! - **Best-effort batches** - One artifact's failure never aborts its
//!   siblings; outcomes are reported per artifact
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use maven_dl::{ArtifactDescriptor, Config, DependencyManager, NoOpInjector};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = DependencyManager::new(Config::default())?;
//!
//!     // Public Maven Central...
//!     manager.enqueue(ArtifactDescriptor::new("org.slf4j", "slf4j-api", "2.0.13"));
//!     // ...or a custom repository
//!     manager.enqueue(ArtifactDescriptor::with_repository(
//!         "com.example",
//!         "internal-api",
//!         "3.2.1",
//!         "https://repo.example.com/releases",
//!     ));
//!
//!     let report = manager.resolve_all(Path::new("libs"), &NoOpInjector).await;
//!     println!(
//!         "{} verified, {} failed",
//!         report.succeeded().count(),
//!         report.failed().count()
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Batch coordination across concurrent fetches
pub mod batch;
/// SHA-1 digesting and sidecar parsing
pub mod checksum;
/// Configuration types
pub mod config;
/// Artifact descriptors and URL resolution
pub mod descriptor;
/// Error types
pub mod error;
/// Single-artifact acquisition
pub mod fetcher;
/// Injection collaborator boundary
pub mod inject;
/// Queue management and injection forwarding
pub mod manager;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, FetchConfig, HttpConfig, RetryConfig};
pub use descriptor::{ArtifactDescriptor, MAVEN_CENTRAL};
pub use error::{Error, IntegrityError, Result, TransportError, ValidationError};
pub use fetcher::ArtifactFetcher;
pub use inject::{ArtifactInjector, NoOpInjector};
pub use manager::{DependencyManager, EnqueueOutcome};
pub use types::{ArtifactOutcome, BatchReport, Event, FetchSource, FetchedArtifact};
