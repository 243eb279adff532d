//! Container image build contexts.
//!
//! Stages the compiled executable, any static assets and a generated
//! `Dockerfile` into one directory that an image builder can consume as-is.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::FunctionAsset;
use crate::compile::{Artifact, BuildError};
use crate::consts::{BINARY_NAME, DOCKERFILE_NAME};
use crate::hash::HashError;
use crate::toolchain::DependencyLister;

const SCRATCH: &str = "scratch";

#[derive(Debug, Error)]
pub enum ContainerError {
  #[error(transparent)]
  Build(#[from] BuildError),

  #[error("cannot locate static assets: {0}")]
  SourceRoot(#[from] HashError),

  #[error("invalid static asset path '{0}': must be relative and stay inside the source root")]
  InvalidAsset(String),

  #[error("failed to copy static asset '{asset}': {source}")]
  CopyAsset {
    asset: String,
    #[source]
    source: io::Error,
  },

  #[error("base image '{0}' has no package manager; cannot install packages")]
  NoPackageManager(String),

  #[error(transparent)]
  Io(#[from] io::Error),
}

/// What goes into the image besides the executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
  pub base_image: String,
  /// Installed with `apk`; requires an Alpine-derived base.
  pub packages: Vec<String>,
  /// Paths relative to the module source root, placed under `/opt`.
  pub static_assets: Vec<String>,
}

impl Default for ContainerSpec {
  fn default() -> Self {
    Self {
      base_image: SCRATCH.to_string(),
      packages: Vec::new(),
      static_assets: Vec::new(),
    }
  }
}

impl ContainerSpec {
  pub fn with_base_image(mut self, image: impl Into<String>) -> Self {
    self.base_image = image.into();
    self
  }

  pub fn with_package(mut self, package: impl Into<String>) -> Self {
    self.packages.push(package.into());
    self
  }

  pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
    self.static_assets.push(asset.into());
    self
  }

  /// Reject unusable settings and return the normalized asset paths.
  pub fn validate(&self) -> Result<Vec<String>, ContainerError> {
    if !self.packages.is_empty() && self.base_image == SCRATCH {
      return Err(ContainerError::NoPackageManager(self.base_image.clone()));
    }
    self.static_assets.iter().map(|a| normalize_asset(a)).collect()
  }
}

/// A staged build context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerImage {
  pub context_dir: PathBuf,
  pub dockerfile: PathBuf,
  /// `<os>/<arch>`, also passed as the `platform` build argument.
  pub platform: String,
  pub build_args: BTreeMap<String, String>,
  pub artifact: Artifact,
}

/// Build `asset` into `staging_dir` and turn the directory into an image
/// build context.
pub fn stage_container<L: DependencyLister>(
  asset: &FunctionAsset<L>,
  spec: &ContainerSpec,
  staging_dir: &Path,
) -> Result<ContainerImage, ContainerError> {
  let assets = spec.validate()?;

  let artifact = asset.bundle(staging_dir)?;

  if !assets.is_empty() {
    let layout = asset.layout()?;
    for name in &assets {
      copy_asset(layout.root(), staging_dir, name)?;
    }
  }

  let binary = artifact
    .path
    .file_name()
    .and_then(|n| n.to_str())
    .unwrap_or(BINARY_NAME);
  let dockerfile = staging_dir.join(DOCKERFILE_NAME);
  fs::write(&dockerfile, render_dockerfile(spec, binary, &assets))?;

  let platform = asset.compiler().platform().container();
  let build_args = BTreeMap::from([("platform".to_string(), platform.clone())]);

  Ok(ContainerImage {
    context_dir: staging_dir.to_path_buf(),
    dockerfile,
    platform,
    build_args,
    artifact,
  })
}

/// Dockerfile text for a staged context.
pub fn render_dockerfile(spec: &ContainerSpec, binary: &str, assets: &[String]) -> String {
  let mut lines = vec![format!("FROM {}", spec.base_image), String::new()];
  if !spec.packages.is_empty() {
    lines.push(format!("RUN apk add --no-cache {}", spec.packages.join(" ")));
  }
  lines.push(format!("ADD {} /bin/{}", binary, binary));
  for asset in assets {
    lines.push(format!("ADD {} /opt/{}", asset, asset));
  }
  lines.push(String::new());
  lines.push(format!("CMD [\"/bin/{}\"]", binary));
  lines.push(String::new());
  lines.join("\n")
}

fn normalize_asset(asset: &str) -> Result<String, ContainerError> {
  let mut parts = Vec::new();
  for component in Path::new(asset).components() {
    match component {
      Component::Normal(part) => match part.to_str() {
        Some(part) => parts.push(part),
        None => return Err(ContainerError::InvalidAsset(asset.to_string())),
      },
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
        return Err(ContainerError::InvalidAsset(asset.to_string()));
      }
    }
  }

  if parts.is_empty() {
    return Err(ContainerError::InvalidAsset(asset.to_string()));
  }
  Ok(parts.join("/"))
}

fn copy_asset(root: &Path, staging_dir: &Path, name: &str) -> Result<(), ContainerError> {
  let source = root.join(name);
  let target = staging_dir.join(name);

  info!(asset = %name, "==> copy");

  let copy = || -> io::Result<()> {
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::copy(&source, &target)?;
    Ok(())
  };

  copy().map_err(|source| ContainerError::CopyAsset {
    asset: name.to_string(),
    source,
  })
}
