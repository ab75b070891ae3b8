//! Single-artifact acquisition: cache check, download, verification.

use crate::checksum;
use crate::config::Config;
use crate::descriptor::ArtifactDescriptor;
use crate::error::{Error, IntegrityError, Result, TransportError};
use crate::retry::fetch_with_retry;
use crate::types::{FetchSource, FetchedArtifact};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Suffix appended to the target file name while the body is streaming in.
/// The finished file is renamed into place so a concurrent reader never
/// observes a partially-written artifact under the final name.
const PART_SUFFIX: &str = ".part";

/// Fetches one artifact at a time: cache short-circuit, streamed download,
/// fail-closed checksum verification
///
/// Cheap to clone; clones share the HTTP client's connection pool and the
/// configuration.
#[derive(Clone)]
pub struct ArtifactFetcher {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl ArtifactFetcher {
    /// Create a fetcher with a shared HTTP client built from `config.http`
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.http.connect_timeout)
            .timeout(config.http.request_timeout)
            .user_agent(config.http.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// The configuration this fetcher was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ensure a verified local copy of `descriptor` exists under `output_dir`
    ///
    /// Either returns a [`FetchedArtifact`] whose path points at a
    /// checksum-verified file, or fails leaving no usable file behind: a
    /// file that cannot be verified, for any reason, is deleted before the
    /// error is reported.
    ///
    /// Steps, strictly sequential per artifact:
    /// 1. If the target file already exists, verify it against the published
    ///    sidecar. Success short-circuits without downloading the body;
    ///    failure deletes the file and falls through.
    /// 2. Stream the body to `<name>.part` and atomically rename into place.
    /// 3. Verify the download; on mismatch delete it and fail (or, with
    ///    `redownload_on_corruption`, re-download exactly once).
    pub async fn acquire(
        &self,
        descriptor: &ArtifactDescriptor,
        output_dir: &Path,
    ) -> Result<FetchedArtifact> {
        tokio::fs::create_dir_all(output_dir).await?;
        let target = output_dir.join(descriptor.file_name());

        let cached = tokio::fs::metadata(&target)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if cached {
            match self.verify(descriptor, &target).await {
                Ok(sha1) => {
                    tracing::debug!(
                        artifact = %descriptor,
                        path = %target.display(),
                        "cache hit, checksum verified"
                    );
                    return Ok(FetchedArtifact {
                        descriptor: descriptor.clone(),
                        path: target,
                        source: FetchSource::Cache,
                        sha1,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        artifact = %descriptor,
                        path = %target.display(),
                        error = %e,
                        "cached file failed verification, discarding"
                    );
                    remove_quietly(&target).await;
                }
            }
        }

        match self.download_and_verify(descriptor, &target).await {
            Err(Error::Integrity(first)) if self.config.fetch.redownload_on_corruption => {
                tracing::warn!(
                    artifact = %descriptor,
                    error = %first,
                    "downloaded artifact failed verification, re-downloading once"
                );
                self.download_and_verify(descriptor, &target).await
            }
            result => result,
        }
    }

    /// Download the body and verify it, deleting the file on verification failure
    async fn download_and_verify(
        &self,
        descriptor: &ArtifactDescriptor,
        target: &Path,
    ) -> Result<FetchedArtifact> {
        self.download(descriptor, target).await?;
        match self.verify(descriptor, target).await {
            Ok(sha1) => {
                tracing::debug!(
                    artifact = %descriptor,
                    path = %target.display(),
                    "artifact downloaded and verified"
                );
                Ok(FetchedArtifact {
                    descriptor: descriptor.clone(),
                    path: target.to_path_buf(),
                    source: FetchSource::Downloaded,
                    sha1,
                })
            }
            Err(e) => {
                remove_quietly(target).await;
                Err(e)
            }
        }
    }

    /// Stream the artifact body to `<target>.part`, then rename into place
    async fn download(&self, descriptor: &ArtifactDescriptor, target: &Path) -> Result<()> {
        let url = descriptor.download_url();
        let part = part_path(target);

        let outcome = fetch_with_retry(&self.config.retry, || {
            self.stream_to_file(&url, &part)
        })
        .await;
        if let Err(e) = outcome {
            remove_quietly(&part).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&part, target).await {
            remove_quietly(&part).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// GET `url` and stream the response body into `path`
    async fn stream_to_file(&self, url: &str, path: &Path) -> Result<()> {
        let response = self
            .client
            .get(parse_url(url)?)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TransportError::BodyRead {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }

    /// Verify `path` against the published sidecar digest
    ///
    /// Fail-closed: a missing or malformed sidecar, or an unreadable local
    /// file, is an integrity failure just like an actual mismatch. Returns
    /// the confirmed lowercase digest on success. Does not delete the file;
    /// callers decide what a failure means for the path they passed in.
    async fn verify(&self, descriptor: &ArtifactDescriptor, path: &Path) -> Result<String> {
        let expected = self.fetch_published_checksum(descriptor).await?;
        let actual = checksum::sha1_file(path)
            .await
            .map_err(|e| IntegrityError::DigestFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if expected.eq_ignore_ascii_case(&actual) {
            Ok(actual)
        } else {
            Err(IntegrityError::ChecksumMismatch {
                url: descriptor.download_url(),
                expected,
                actual,
            }
            .into())
        }
    }

    /// Fetch and parse the `.sha1` sidecar for `descriptor`
    ///
    /// Transport problems reaching the sidecar surface as
    /// [`IntegrityError::SidecarUnavailable`]: without the published digest
    /// the artifact cannot be verified, and an unverifiable artifact is
    /// never valid.
    async fn fetch_published_checksum(&self, descriptor: &ArtifactDescriptor) -> Result<String> {
        let url = descriptor.checksum_url();
        let body = fetch_with_retry(&self.config.retry, || self.fetch_text(&url))
            .await
            .map_err(|e| IntegrityError::SidecarUnavailable {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Ok(checksum::parse_sidecar(&url, &body)?)
    }

    /// GET `url` and return the body as text
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(parse_url(url)?)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        response.text().await.map_err(|e| {
            TransportError::BodyRead {
                url: url.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Parse a computed URL, mapping garbage repositories to a transport error
/// before any request is attempted
fn parse_url(url: &str) -> Result<url::Url> {
    url::Url::parse(url).map_err(|e| {
        TransportError::Request {
            url: url.to_string(),
            reason: format!("invalid URL: {e}"),
        }
        .into()
    })
}

/// The in-progress sibling of `target` (`lib-1.0.0.jar` -> `lib-1.0.0.jar.part`)
fn part_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Best-effort file removal; the file may already be gone
async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove file");
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_url_rejects_garbage() {
        let err = parse_url("::::/org/example/lib.jar").unwrap_err();
        assert_eq!(err.kind(), "request_failed");
        assert!(parse_url("https://repo.example/lib.jar").is_ok());
    }

    #[test]
    fn part_path_appends_suffix_to_full_name() {
        let part = part_path(Path::new("/libs/lib-1.0.0.jar"));
        assert_eq!(part, Path::new("/libs/lib-1.0.0.jar.part"));
    }

    #[tokio::test]
    async fn remove_quietly_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        // Does not panic or log an error for an absent path
        remove_quietly(&dir.path().join("absent.jar")).await;
    }

    #[test]
    fn fetcher_rejects_invalid_config() {
        let config = Config {
            fetch: crate::config::FetchConfig {
                max_concurrent_fetches: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ArtifactFetcher::new(config).is_err());
    }

    #[test]
    fn fetcher_clones_share_config() {
        let fetcher = ArtifactFetcher::new(Config::default()).unwrap();
        let clone = fetcher.clone();
        assert_eq!(
            fetcher.config().fetch.max_concurrent_fetches,
            clone.config().fetch.max_concurrent_fetches
        );
    }
}
