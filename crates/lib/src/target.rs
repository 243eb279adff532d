//! Build target identity.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
  #[error("module path must not be empty")]
  EmptyModule,

  #[error("entry path must be relative to the module: {0}")]
  AbsoluteEntry(String),

  #[error("entry path must not contain '..' segments: {0}")]
  ParentSegment(String),
}

/// Identity of one deployable unit: module path, entry sub-path and an
/// optional version tag.
///
/// Import paths always use `/` as separator, independent of the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildTarget {
  module: String,
  entry: String,
  version: Option<String>,
}

impl BuildTarget {
  pub fn new(module: &str, entry: &str, version: Option<&str>) -> Result<Self, TargetError> {
    let module = module.trim_matches('/');
    if module.is_empty() {
      return Err(TargetError::EmptyModule);
    }

    if entry.starts_with('/') || Path::new(entry).is_absolute() {
      return Err(TargetError::AbsoluteEntry(entry.to_string()));
    }

    let segments: Vec<&str> = entry.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    if segments.contains(&"..") {
      return Err(TargetError::ParentSegment(entry.to_string()));
    }

    Ok(Self {
      module: module.to_string(),
      entry: segments.join("/"),
      version: version.filter(|v| !v.is_empty()).map(str::to_string),
    })
  }

  pub fn module(&self) -> &str {
    &self.module
  }

  pub fn entry(&self) -> &str {
    &self.entry
  }

  pub fn version(&self) -> Option<&str> {
    self.version.as_deref()
  }

  /// Full import path of the entry package.
  pub fn package_path(&self) -> String {
    if self.entry.is_empty() {
      self.module.clone()
    } else {
      format!("{}/{}", self.module, self.entry)
    }
  }

  /// Last segment of the package path, used to name the function.
  pub fn base_name(&self) -> &str {
    let path = if self.entry.is_empty() { &self.module } else { &self.entry };
    path.rsplit('/').next().unwrap_or(path)
  }

  /// A directory under `base` that is unique to this target.
  pub fn staging_dir(&self, base: &Path) -> PathBuf {
    self
      .package_path()
      .split('/')
      .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
  }
}

impl fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.package_path())?;
    if let Some(version) = &self.version {
      write!(f, "@{}", version)?;
    }
    Ok(())
  }
}
