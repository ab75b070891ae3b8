//! End-to-end tests against the real Maven Central repository.
//!
//! These tests perform outbound network requests and are gated behind the
//! `live-tests` feature to prevent running in normal CI.
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --features live-tests --test live_maven_central -- --nocapture
//! ```

#![cfg(feature = "live-tests")]

use maven_dl::{ArtifactDescriptor, ArtifactFetcher, Config, FetchSource};

/// A small, stable artifact that has been on Central for over a decade
fn tiny_artifact() -> ArtifactDescriptor {
    ArtifactDescriptor::new("org.hamcrest", "hamcrest-core", "1.3")
}

#[tokio::test]
async fn acquire_real_artifact_from_maven_central() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = ArtifactFetcher::new(Config::default()).unwrap();

    let artifact = fetcher.acquire(&tiny_artifact(), dir.path()).await.unwrap();

    assert_eq!(artifact.source, FetchSource::Downloaded);
    assert_eq!(artifact.path, dir.path().join("hamcrest-core-1.3.jar"));
    assert_eq!(artifact.sha1.len(), 40);
    assert!(artifact.path.metadata().unwrap().len() > 0);

    // A second acquisition of the verified file is a cache hit
    let again = fetcher.acquire(&tiny_artifact(), dir.path()).await.unwrap();
    assert_eq!(again.source, FetchSource::Cache);
    assert_eq!(again.sha1, artifact.sha1);
}

#[tokio::test]
async fn nonexistent_artifact_fails_with_http_status() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = ArtifactFetcher::new(Config::default()).unwrap();

    let descriptor = ArtifactDescriptor::new("org.example.nonexistent", "no-such-lib", "0.0.0");
    let err = fetcher.acquire(&descriptor, dir.path()).await.unwrap_err();
    assert_eq!(err.kind(), "http_status");
}
