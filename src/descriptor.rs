//! Artifact descriptors and canonical URL resolution.

use crate::error::ValidationError;
use serde::Serialize;

/// The public Maven Central repository, used when no repository is given
pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2/";

/// Immutable identifier for one downloadable artifact and its source repository
///
/// Two descriptors denote the same artifact iff all four fields are equal;
/// the derived `PartialEq`/`Eq`/`Hash` give the structural equality the
/// queue's duplicate suppression relies on.
///
/// The repository base URL is normalized at construction: it always ends with
/// exactly one `/`, and an empty input falls back to [`MAVEN_CENTRAL`].
///
/// # Examples
///
/// ```
/// use maven_dl::ArtifactDescriptor;
///
/// let descriptor = ArtifactDescriptor::new("org.example", "lib", "1.0.0");
/// assert_eq!(
///     descriptor.download_url(),
///     "https://repo1.maven.org/maven2/org/example/lib/1.0.0/lib-1.0.0.jar"
/// );
/// assert_eq!(descriptor.file_name(), "lib-1.0.0.jar");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactDescriptor {
    group_id: String,
    artifact_id: String,
    version: String,
    repository: String,
}

impl ArtifactDescriptor {
    /// Create a descriptor for an artifact hosted on the public Maven Central
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::with_repository(group_id, artifact_id, version, MAVEN_CENTRAL)
    }

    /// Create a descriptor for an artifact hosted on a custom repository
    ///
    /// An empty `repository` falls back to [`MAVEN_CENTRAL`]; a missing
    /// trailing slash is added, an existing one is kept as-is.
    pub fn with_repository(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        repository: impl AsRef<str>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            repository: normalize_repository(repository.as_ref()),
        }
    }

    /// The group identifier (dot-separated namespace)
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// The artifact identifier
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// The artifact version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The normalized repository base URL (always slash-terminated)
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// The canonical download URL of the artifact jar
    pub fn download_url(&self) -> String {
        format!(
            "{}{}/{}/{}/{}",
            self.repository,
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            self.file_name(),
        )
    }

    /// The well-known sidecar URL of the published SHA-1 digest
    pub fn checksum_url(&self) -> String {
        format!("{}.sha1", self.download_url())
    }

    /// The local file name the artifact is stored under
    pub fn file_name(&self) -> String {
        format!("{}-{}.jar", self.artifact_id, self.version)
    }

    /// Check that all required coordinate fields are non-empty
    ///
    /// Called at the queue boundary; the constructor deliberately accepts
    /// anything so descriptors stay a pure value type.
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.group_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "group_id" });
        }
        if self.artifact_id.is_empty() {
            return Err(ValidationError::EmptyField { field: "artifact_id" });
        }
        if self.version.is_empty() {
            return Err(ValidationError::EmptyField { field: "version" });
        }
        Ok(())
    }
}

impl std::fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

fn normalize_repository(repository: &str) -> String {
    if repository.is_empty() {
        MAVEN_CENTRAL.to_string()
    } else if repository.ends_with('/') {
        repository.to_string()
    } else {
        format!("{repository}/")
    }
}
