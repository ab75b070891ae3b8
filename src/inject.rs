//! Injection collaborator boundary
//!
//! The pipeline's job ends at a verified local file. Making that file's
//! contents available to the running process (a plugin classloader, a
//! dynamic module host, a JVM attach hook) is entirely the host's concern,
//! expressed through the [`ArtifactInjector`] trait.

use crate::descriptor::ArtifactDescriptor;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for making a verified artifact available to the running process
///
/// Invoked by [`crate::DependencyManager::resolve_all`] once per
/// successfully verified artifact. Failed artifacts are never offered: the
/// collaborator can rely on the path pointing at a checksum-verified file.
///
/// Implementations must be cheap to call repeatedly and must not delete or
/// move the file; ownership of the file stays with the caller of
/// `resolve_all`.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use maven_dl::{ArtifactDescriptor, ArtifactInjector};
/// use std::path::Path;
///
/// struct PrintingInjector;
///
/// #[async_trait]
/// impl ArtifactInjector for PrintingInjector {
///     async fn inject(
///         &self,
///         descriptor: &ArtifactDescriptor,
///         artifact: &Path,
///     ) -> maven_dl::Result<()> {
///         println!("loading {} from {}", descriptor, artifact.display());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ArtifactInjector: Send + Sync {
    /// Accept a verified artifact and make its contents available
    ///
    /// # Arguments
    ///
    /// * `descriptor` - The artifact's coordinates
    /// * `artifact` - Path to the verified local file
    ///
    /// # Errors
    ///
    /// An error marks the injection as failed in the pipeline's events and
    /// logs, but never un-fetches the artifact: the verified file stays on
    /// disk for the next run.
    async fn inject(&self, descriptor: &ArtifactDescriptor, artifact: &Path) -> Result<()>;
}

/// Injector that accepts every artifact without loading anything
///
/// For hosts that only want verified files on disk (e.g. a warm-up step
/// that populates the cache before the real runtime starts).
///
/// # Examples
///
/// ```
/// use maven_dl::{ArtifactDescriptor, ArtifactInjector, NoOpInjector};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let injector = NoOpInjector;
/// let descriptor = ArtifactDescriptor::new("org.example", "lib", "1.0.0");
/// injector.inject(&descriptor, Path::new("libs/lib-1.0.0.jar")).await?;
/// # Ok(())
/// # }
/// ```
pub struct NoOpInjector;

#[async_trait]
impl ArtifactInjector for NoOpInjector {
    async fn inject(&self, descriptor: &ArtifactDescriptor, artifact: &Path) -> Result<()> {
        tracing::debug!(
            artifact = %descriptor,
            path = %artifact.display(),
            "no-op injector accepted artifact"
        );
        Ok(())
    }
}
