use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BINARY_NAME, DEFAULT_BUILD_TAGS};

/// Errors that end a build attempt. None of them are retried.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The toolchain process could not be started.
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// The toolchain exited unsuccessfully.
  #[error("build of {package} failed with exit code {code:?}")]
  Failed { package: String, code: Option<i32> },

  /// The toolchain reported success but left no executable behind.
  #[error("build of {package} produced no artifact at {path}")]
  MissingArtifact { package: String, path: PathBuf },

  /// The compression step failed; the uncompressed binary is not trusted.
  #[error("post-processing of {path} failed: {reason}")]
  PostProcess { path: PathBuf, reason: String },

  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

/// Caller-controlled knobs of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
  /// Link-time `name=value` constants (`-X name=value`).
  pub vars: BTreeMap<String, String>,
  /// Environment overrides; always win over inherited and default values.
  pub env: BTreeMap<String, String>,
  /// Build tags.
  pub tags: Vec<String>,
  /// File name of the produced executable.
  pub binary_name: String,
  /// Forces compression on or off; `None` defers to the host opt-in flag.
  pub compress: Option<bool>,
  /// Directory the toolchain runs in (normally the module source root).
  pub workdir: Option<PathBuf>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      vars: BTreeMap::new(),
      env: BTreeMap::new(),
      tags: DEFAULT_BUILD_TAGS.iter().map(|t| t.to_string()).collect(),
      binary_name: BINARY_NAME.to_string(),
      compress: None,
      workdir: None,
    }
  }
}

impl BuildOptions {
  pub fn with_var(mut self, name: &str, value: &str) -> Self {
    self.vars.insert(name.to_string(), value.to_string());
    self
  }

  pub fn with_env(mut self, name: &str, value: &str) -> Self {
    self.env.insert(name.to_string(), value.to_string());
    self
  }

  /// Add a build tag after the defaults.
  pub fn with_tag(mut self, tag: &str) -> Self {
    if !self.tags.iter().any(|t| t == tag) {
      self.tags.push(tag.to_string());
    }
    self
  }

  pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
    self.workdir = Some(workdir.into());
    self
  }

  pub fn with_compress(mut self, compress: bool) -> Self {
    self.compress = Some(compress);
    self
  }
}

/// A compiled executable ready to ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  pub path: PathBuf,
  pub size: u64,
  /// SHA-256 of the final bytes, after any compression.
  pub sha256: String,
  pub compressed: bool,
}
