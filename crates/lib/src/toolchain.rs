//! External toolchain access.
//!
//! The hasher only needs one thing from the toolchain: the list of packages
//! an entry point imports. That seam is [`DependencyLister`]; [`GoToolchain`]
//! implements it by shelling out to `go list`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::hash::HashError;

/// Template that prints one dependency import path per line.
const DEPS_TEMPLATE: &str = "{{join .Deps \"\\n\"}}";

/// Lists the transitive imports of a package.
pub trait DependencyLister {
  /// Returns every package `package` depends on, in toolchain order.
  /// The package itself is not included.
  fn list_deps(&self, package: &str, workdir: &Path) -> Result<Vec<String>, HashError>;
}

/// The Go toolchain binary plus extra variables for `go list`.
#[derive(Debug, Clone)]
pub struct GoToolchain {
  program: PathBuf,
  list_env: BTreeMap<String, String>,
  tags: Vec<String>,
}

impl Default for GoToolchain {
  fn default() -> Self {
    Self {
      program: PathBuf::from("go"),
      list_env: BTreeMap::new(),
      tags: Vec::new(),
    }
  }
}

impl GoToolchain {
  pub fn new() -> Self {
    Self::default()
  }

  /// Use a specific toolchain binary instead of `go` from `PATH`.
  pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
    self.program = program.into();
    self
  }

  /// Variables layered over the inherited environment when listing
  /// dependencies, so build constraints match the compiled target.
  pub fn with_list_env(mut self, env: BTreeMap<String, String>) -> Self {
    self.list_env = env;
    self
  }

  /// Build constraints, matching the `-tags` given to `go build`.
  pub fn with_tags(mut self, tags: Vec<String>) -> Self {
    self.tags = tags;
    self
  }

  pub fn program(&self) -> &Path {
    &self.program
  }

  pub fn list_args(&self, package: &str) -> Vec<String> {
    let mut args = vec!["list".to_string()];
    if !self.tags.is_empty() {
      args.push("-tags".to_string());
      args.push(self.tags.join(","));
    }
    args.extend(["-f".to_string(), DEPS_TEMPLATE.to_string(), package.to_string()]);
    args
  }
}

impl DependencyLister for GoToolchain {
  fn list_deps(&self, package: &str, workdir: &Path) -> Result<Vec<String>, HashError> {
    let resolution_error = |reason: String| HashError::DependencyResolution {
      package: package.to_string(),
      reason,
    };

    let mut command = Command::new(&self.program);
    command
      .args(self.list_args(package))
      .current_dir(workdir)
      .envs(&self.list_env);

    debug!(program = ?self.program, package = %package, workdir = ?workdir, "listing dependencies");

    let output = command
      .output()
      .map_err(|e| resolution_error(format!("failed to run {}: {}", self.program.display(), e)))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stderr.is_empty() {
        warn!(stderr = %stderr.trim_end(), "dependency listing failed");
      }
      return Err(resolution_error(format!(
        "{} list exited with code {:?}",
        self.program.display(),
        output.status.code()
      )));
    }

    parse_deps(&output.stdout).map_err(|e| resolution_error(format!("unreadable listing output: {}", e)))
  }
}

/// Split listing output into import paths, dropping blank lines.
pub fn parse_deps(stdout: &[u8]) -> Result<Vec<String>, std::str::Utf8Error> {
  let text = std::str::from_utf8(stdout)?;
  Ok(
    text
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(str::to_string)
      .collect(),
  )
}
