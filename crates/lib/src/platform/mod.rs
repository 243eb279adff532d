pub mod arch;

use arch::TargetArch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment platform combining OS and architecture (e.g., "linux/arm64")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub os: String,
  pub arch: TargetArch,
}

impl Platform {
  pub fn new(os: &str, arch: TargetArch) -> Self {
    Self { os: os.to_string(), arch }
  }

  /// Platform string used to select container base layers.
  pub fn container(&self) -> String {
    format!("{}/{}", self.os, self.arch)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.container())
  }
}

/// Returns the host platform as reported by the Rust runtime
/// (e.g., "linux/x86_64"). Informational only.
pub fn host_triple() -> String {
  format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}
