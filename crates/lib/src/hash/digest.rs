//! Incremental digest with framed file records.
//!
//! Record layout:
//!
//! ```text
//! package: <module> <entry>[@<version>]\n
//! <file name=<package>/<file> size=<len>>\n<raw bytes></file>\n
//! ...
//! ```
//!
//! The explicit size makes every record self-delimiting, so no sequence of
//! files can produce the same byte stream as a different sequence.

use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::types::{ContentDigest, HashError};
use crate::target::BuildTarget;

pub struct DigestWriter {
  hasher: Sha256,
}

impl DigestWriter {
  /// Start a digest seeded with the target's header record.
  pub fn new(target: &BuildTarget) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(header(target).as_bytes());
    Self { hasher }
  }

  /// Fold one framed file record into the digest.
  pub fn write_record(&mut self, name: &str, content: &[u8]) {
    self
      .hasher
      .update(format!("<file name={} size={}>\n", name, content.len()).as_bytes());
    self.hasher.update(content);
    self.hasher.update(b"</file>\n");
  }

  /// Read `path` and fold it in under `name`.
  pub fn write_file(&mut self, name: &str, path: &Path) -> Result<(), HashError> {
    let content = fs::read(path).map_err(|source| HashError::FileAccess {
      path: path.to_path_buf(),
      source,
    })?;
    self.write_record(name, &content);
    Ok(())
  }

  pub fn finish(self) -> ContentDigest {
    ContentDigest(hex::encode(self.hasher.finalize()))
  }
}

fn header(target: &BuildTarget) -> String {
  let version = target.version().map(|v| format!("@{}", v)).unwrap_or_default();
  format!("package: {} {}{}\n", target.module(), target.entry(), version)
}

/// SHA-256 of a file's bytes, streamed.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
  let mut file = fs::File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(hex::encode(hasher.finalize()))
}
