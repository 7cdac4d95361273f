//! Streaming SHA-256 digests and canonical gateway URL derivation
//!
//! Download URLs are a function of file content only (plus the trailing
//! filename segment), so re-published identical bytes land on the same
//! origin path.

use crate::core::error::{CgwResult, ResultExt};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Origin path prefix for content-addressed downloads
const ORIGIN_PREFIX: &str = "/content/origin/files/sha256";

/// Short URL path prefix
const SHORT_PREFIX: &str = "/cgw";

/// Hex-encoded SHA-256 digest of a content file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDigest(String);

impl ContentDigest {
  /// Compute the digest of a file by streaming it in fixed-size chunks
  ///
  /// Reads the whole file regardless of size; memory use is bounded by the
  /// chunk buffer. An unreadable file is fatal for the run.
  pub fn from_file(path: &Path) -> CgwResult<Self> {
    let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
      let bytes_read = file
        .read(&mut buffer)
        .with_context(|| format!("Failed to read {}", path.display()))?;
      if bytes_read == 0 {
        break;
      }
      hasher.update(&buffer[..bytes_read]);
    }

    Ok(Self(format!("{:x}", hasher.finalize())))
  }

  /// Digest of an in-memory buffer (tests and small inputs)
  pub fn from_bytes(bytes: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Self(format!("{:x}", hasher.finalize()))
  }

  /// Full lowercase hex digest
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Two-character bucket prefix used in origin paths
  pub fn bucket(&self) -> &str {
    &self.0[..2]
  }
}

impl fmt::Display for ContentDigest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Canonical download URL for a file with the given digest
pub fn download_url(digest: &ContentDigest, file_name: &str) -> String {
  format!("{}/{}/{}/{}", ORIGIN_PREFIX, digest.bucket(), digest, file_name)
}

/// Short URL under the product code
pub fn short_url(product_code: &str, file_name: &str) -> String {
  format!("{}/{}/{}", SHORT_PREFIX, product_code, file_name)
}
