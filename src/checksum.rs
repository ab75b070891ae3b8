//! SHA-1 digesting and checksum sidecar parsing.
//!
//! Maven repositories publish a `.sha1` sidecar next to every artifact. The
//! digest is computed here in bounded-memory chunks so large jars never get
//! buffered whole.

use crate::error::IntegrityError;
use sha1::{Digest, Sha1};
use std::path::Path;
use tokio::io::AsyncReadExt;

const BUF_SIZE: usize = 64 * 1024;

/// Length of a SHA-1 digest in hex characters
const SHA1_HEX_LEN: usize = 40;

/// Compute the SHA-1 of a file and return the digest as lowercase hex.
///
/// Reads in chunks to keep memory use bounded; suitable for large jars.
pub async fn sha1_file(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Extract the published digest from a checksum sidecar body.
///
/// Sidecars are a single text token, but published files commonly carry a
/// trailing newline or an appended file name (`<digest>  <name>`); only the
/// first whitespace-delimited token counts. The token must be exactly 40 hex
/// characters and is returned lowercased for case-insensitive comparison.
pub fn parse_sidecar(url: &str, body: &str) -> Result<String, IntegrityError> {
    let malformed = || IntegrityError::MalformedSidecar {
        url: url.to_string(),
        body: body.trim().to_string(),
    };

    let token = body.split_whitespace().next().ok_or_else(malformed)?;
    if token.len() != SHA1_HEX_LEN || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    Ok(token.to_ascii_lowercase())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn sha1_file_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let digest = sha1_file(f.path()).await.unwrap();
        assert_eq!(digest, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[tokio::test]
    async fn sha1_file_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        let digest = sha1_file(f.path()).await.unwrap();
        assert_eq!(digest, "f572d396fae9206628714fb2ce00f72e94f2258f");
    }

    #[tokio::test]
    async fn sha1_file_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = sha1_file(&dir.path().join("absent.jar")).await;
        assert!(result.is_err());
    }

    const DIGEST: &str = "f572d396fae9206628714fb2ce00f72e94f2258f";
    const URL: &str = "https://repo.example/lib-1.0.0.jar.sha1";

    #[test]
    fn parse_sidecar_plain_token() {
        assert_eq!(parse_sidecar(URL, DIGEST).unwrap(), DIGEST);
    }

    #[test]
    fn parse_sidecar_trims_trailing_newline() {
        let body = format!("{DIGEST}\n");
        assert_eq!(parse_sidecar(URL, &body).unwrap(), DIGEST);
    }

    #[test]
    fn parse_sidecar_ignores_appended_file_name() {
        let body = format!("{DIGEST}  lib-1.0.0.jar\n");
        assert_eq!(parse_sidecar(URL, &body).unwrap(), DIGEST);
    }

    #[test]
    fn parse_sidecar_lowercases_uppercase_digest() {
        let body = DIGEST.to_ascii_uppercase();
        assert_eq!(parse_sidecar(URL, &body).unwrap(), DIGEST);
    }

    #[test]
    fn parse_sidecar_rejects_empty_body() {
        assert!(matches!(
            parse_sidecar(URL, "  \n"),
            Err(IntegrityError::MalformedSidecar { .. })
        ));
    }

    #[test]
    fn parse_sidecar_rejects_wrong_length() {
        assert!(parse_sidecar(URL, "abc123").is_err());
        let too_long = format!("{DIGEST}00");
        assert!(parse_sidecar(URL, &too_long).is_err());
    }

    #[test]
    fn parse_sidecar_rejects_non_hex_token() {
        // 40 characters, but 'z' is not a hex digit
        let body = "z572d396fae9206628714fb2ce00f72e94f2258f";
        assert!(parse_sidecar(URL, body).is_err());
    }
}
