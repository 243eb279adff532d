use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a digest computation. No partial digest is ever
/// returned.
#[derive(Debug, Error)]
pub enum HashError {
  /// The toolchain could not list dependencies, or the module root is missing.
  #[error("cannot resolve dependencies of {package}: {reason}")]
  DependencyResolution { package: String, reason: String },

  /// A closure member's source directory cannot be listed.
  #[error("cannot read package {package} at {path}: {source}")]
  MissingPackage {
    package: String,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A matched source file cannot be opened or read.
  #[error("cannot read source file {path}: {source}")]
  FileAccess {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A full 64-character SHA-256 fingerprint of a build target's sources.
///
/// Opaque to callers; suitable as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(pub String);

impl ContentDigest {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Leading characters for progress output.
  pub fn short(&self, len: usize) -> &str {
    &self.0[..len.min(self.0.len())]
  }
}

impl fmt::Display for ContentDigest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
