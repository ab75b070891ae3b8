//! Error types for maven-dl
//!
//! This module provides the error taxonomy for the acquisition pipeline:
//! - Validation errors, surfaced when a descriptor is rejected at the queue
//!   boundary
//! - Transport errors from fetching the artifact body
//! - Integrity errors from checksum verification (fail-closed: an
//!   unverifiable artifact is never treated as valid)
//!
//! Per-artifact failures travel as values inside [`crate::BatchReport`]
//! outcomes; they are never raised out of a batch operation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for maven-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for maven-dl
///
/// Each variant includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_concurrent_fetches")
        key: Option<String>,
    },

    /// Descriptor rejected before acquisition started
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Fetching the artifact body failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Checksum verification failed or could not be performed
    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction or protocol error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The injection collaborator refused a verified artifact
    #[error("injection error: {0}")]
    Injection(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Descriptor validation errors
///
/// Raised at the queue boundary, not in the descriptor constructor: the
/// descriptor itself is a pure value type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required coordinate field is empty
    #[error("descriptor field `{field}` is empty")]
    EmptyField {
        /// Which field was empty ("group_id", "artifact_id" or "version")
        field: &'static str,
    },
}

/// Transport errors while fetching an artifact body
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or completed
    #[error("GET {url} failed: {reason}")]
    Request {
        /// The URL that was requested
        url: String,
        /// Why the request failed
        reason: String,
    },

    /// The server answered with a non-success status
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// The response body stream broke mid-transfer
    #[error("reading response body from {url} failed: {reason}")]
    BodyRead {
        /// The URL whose body was being streamed
        url: String,
        /// Why the stream failed
        reason: String,
    },

    /// The batch deadline elapsed before this artifact finished
    #[error("batch deadline exceeded before {coordinate} finished")]
    DeadlineExceeded {
        /// The artifact coordinate that was still in flight
        coordinate: String,
    },

    /// The acquisition task died (panicked or was aborted)
    #[error("fetch task for {coordinate} failed: {reason}")]
    TaskFailed {
        /// The artifact coordinate whose task died
        coordinate: String,
        /// The join error description
        reason: String,
    },
}

/// Integrity errors during checksum verification
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// The computed digest does not match the published one
    #[error("checksum mismatch for {url}: published {expected}, computed {actual}")]
    ChecksumMismatch {
        /// The artifact URL that failed verification
        url: String,
        /// The digest published in the sidecar (lowercase hex)
        expected: String,
        /// The digest computed from the local file (lowercase hex)
        actual: String,
    },

    /// The checksum sidecar could not be fetched
    #[error("checksum sidecar {url} unavailable: {reason}")]
    SidecarUnavailable {
        /// The sidecar URL
        url: String,
        /// Why the sidecar could not be fetched
        reason: String,
    },

    /// The sidecar body does not contain a SHA-1 digest
    #[error("checksum sidecar {url} is malformed: {body:?}")]
    MalformedSidecar {
        /// The sidecar URL
        url: String,
        /// The (trimmed) body that failed to parse
        body: String,
    },

    /// The local file could not be digested
    #[error("failed to digest {}: {reason}", .path.display())]
    DigestFailed {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying I/O failure
        reason: String,
    },
}

impl Error {
    /// Machine-readable error kind (e.g., "checksum_mismatch")
    ///
    /// Stable strings suitable for programmatic handling and log filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::Transport(e) => match e {
                TransportError::Request { .. } => "request_failed",
                TransportError::HttpStatus { .. } => "http_status",
                TransportError::BodyRead { .. } => "body_read_failed",
                TransportError::DeadlineExceeded { .. } => "deadline_exceeded",
                TransportError::TaskFailed { .. } => "task_failed",
            },
            Error::Integrity(e) => match e {
                IntegrityError::ChecksumMismatch { .. } => "checksum_mismatch",
                IntegrityError::SidecarUnavailable { .. } => "sidecar_unavailable",
                IntegrityError::MalformedSidecar { .. } => "malformed_sidecar",
                IntegrityError::DigestFailed { .. } => "digest_failed",
            },
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Injection(_) => "injection_error",
            Error::Other(_) => "internal_error",
        }
    }
}
