//! Mapping import paths to source directories.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::types::HashError;
use crate::config::HostEnv;
use crate::consts::HASHED_EXTENSIONS;
use crate::target::BuildTarget;

/// Where a module's sources live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
  module: String,
  root: PathBuf,
}

impl SourceLayout {
  pub fn new(module: &str, root: impl Into<PathBuf>) -> Self {
    Self {
      module: module.trim_matches('/').to_string(),
      root: root.into(),
    }
  }

  /// Locate the module's source root from host signals.
  ///
  /// The CI workspace root wins; otherwise `<GOPATH>/src/<module>`.
  pub fn locate(target: &BuildTarget, host: &HostEnv) -> Result<Self, HashError> {
    let root = match host.workspace_root() {
      Some(workspace) => workspace,
      None => {
        let gopath = host.gopath().ok_or_else(|| HashError::DependencyResolution {
          package: target.package_path(),
          reason: "neither a workspace root nor GOPATH/HOME is set".to_string(),
        })?;
        join_import_path(&gopath.join("src"), target.module())
      }
    };

    if !root.is_dir() {
      return Err(HashError::DependencyResolution {
        package: target.package_path(),
        reason: format!("module source root not found at {}", root.display()),
      });
    }

    let root = dunce::canonicalize(&root).unwrap_or(root);
    Ok(Self::new(target.module(), root))
  }

  pub fn module(&self) -> &str {
    &self.module
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// True when `package` belongs to this module.
  pub fn contains(&self, package: &str) -> bool {
    package == self.module
      || package
        .strip_prefix(self.module.as_str())
        .is_some_and(|rest| rest.starts_with('/'))
  }

  /// Source directory of an in-module package.
  pub fn package_dir(&self, package: &str) -> PathBuf {
    let relative = package.strip_prefix(self.module.as_str()).unwrap_or(package);
    join_import_path(&self.root, relative)
  }
}

fn join_import_path(base: &Path, import_path: &str) -> PathBuf {
  import_path
    .split('/')
    .filter(|s| !s.is_empty())
    .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Selects the files of a package directory that feed the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter {
  extensions: Vec<String>,
}

impl Default for SourceFilter {
  fn default() -> Self {
    Self::new(HASHED_EXTENSIONS.iter().copied())
  }
}

impl SourceFilter {
  pub fn new<'a>(extensions: impl IntoIterator<Item = &'a str>) -> Self {
    Self {
      extensions: extensions.into_iter().map(|e| e.trim_start_matches('.').to_string()).collect(),
    }
  }

  pub fn matches(&self, file_name: &str) -> bool {
    self.extensions.iter().any(|ext| {
      file_name
        .strip_suffix(ext.as_str())
        .is_some_and(|stem| stem.ends_with('.'))
    })
  }

  /// Matching regular files directly inside `dir`, sorted by name.
  ///
  /// Subdirectories are never descended into. Links are only resolved for
  /// names that match, so a dangling link to an unrelated file is ignored;
  /// symlinks to files count as files.
  pub fn package_files(&self, package: &str, dir: &Path) -> Result<Vec<(String, PathBuf)>, HashError> {
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
      let entry = entry.map_err(|e| HashError::MissingPackage {
        package: package.to_string(),
        path: dir.to_path_buf(),
        source: e.into(),
      })?;

      let Some(name) = entry.file_name().to_str() else {
        continue;
      };
      if !self.matches(name) {
        continue;
      }

      let is_file = if entry.path_is_symlink() {
        fs::metadata(entry.path())
          .map_err(|source| HashError::FileAccess {
            path: entry.path().to_path_buf(),
            source,
          })?
          .is_file()
      } else {
        entry.file_type().is_file()
      };

      if is_file {
        files.push((name.to_string(), entry.into_path()));
      }
    }

    Ok(files)
  }
}
