//! Host configuration.
//!
//! Everything the library learns from the invoking process goes through
//! [`HostEnv`], a snapshot taken once per request. Algorithms receive the
//! snapshot explicitly instead of reading `std::env` on their own.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::consts::env;

/// Variables captured from the host process.
const CAPTURED_VARS: &[&str] = &[
  env::WORKSPACE,
  env::CI_ACTION,
  env::COMPRESS,
  env::HOME,
  env::PATH,
  env::GOPATH,
  env::GOROOT,
  env::GOMODCACHE,
  env::GOCACHE,
];

/// Errors raised while validating build configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  /// `GOARCH` names an architecture that cannot be deployed.
  #[error("unsupported target architecture {0:?} (expected amd64 or arm64)")]
  UnsupportedArch(String),

  #[error("link variable {0} holds whitespace and both quote characters; the linker cannot receive it")]
  UnquotableVar(String),
}

/// Snapshot of the host process variables the library consults.
///
/// Empty values are treated the same as unset ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
  vars: BTreeMap<String, String>,
}

impl HostEnv {
  /// Capture the relevant variables from the current process.
  pub fn capture() -> Self {
    let vars = CAPTURED_VARS
      .iter()
      .filter_map(|name| std::env::var(name).ok().map(|value| (name.to_string(), value)))
      .filter(|(_, value)| !value.is_empty())
      .collect();
    Self { vars }
  }

  /// Build a snapshot from explicit pairs.
  pub fn from_vars<I, K, V>(vars: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let vars = vars
      .into_iter()
      .map(|(k, v)| (k.into(), v.into()))
      .filter(|(_, v): &(String, String)| !v.is_empty())
      .collect();
    Self { vars }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.vars.get(name).map(String::as_str)
  }

  /// True when running under a recognized CI system.
  pub fn is_ci(&self) -> bool {
    self.get(env::CI_ACTION).is_some()
  }

  /// True when the artifact compression step has been opted into.
  pub fn compress_enabled(&self) -> bool {
    self.get(env::COMPRESS) == Some("1")
  }

  /// Workspace root announced by CI, if any.
  pub fn workspace_root(&self) -> Option<PathBuf> {
    self.get(env::WORKSPACE).map(PathBuf::from)
  }

  /// Toolchain workspace: `GOPATH`, falling back to `$HOME/go`.
  pub fn gopath(&self) -> Option<PathBuf> {
    self
      .get(env::GOPATH)
      .map(PathBuf::from)
      .or_else(|| self.get(env::HOME).map(|home| PathBuf::from(home).join("go")))
  }
}
