use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU architectures a function can be deployed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetArch {
  Amd64,
  #[default]
  Arm64,
}

impl TargetArch {
  /// Parse a toolchain architecture name (`GOARCH`).
  pub fn from_goarch(value: &str) -> Option<Self> {
    match value {
      "amd64" => Some(Self::Amd64),
      "arm64" => Some(Self::Arm64),
      _ => None,
    }
  }

  /// Returns the toolchain identifier for this architecture
  pub fn as_goarch(&self) -> &'static str {
    match self {
      Self::Amd64 => "amd64",
      Self::Arm64 => "arm64",
    }
  }

  /// Architecture name used by the function runtime.
  pub fn function_architecture(&self) -> &'static str {
    match self {
      Self::Amd64 => "x86_64",
      Self::Arm64 => "arm64",
    }
  }
}

impl fmt::Display for TargetArch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_goarch())
  }
}
