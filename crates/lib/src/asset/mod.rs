//! Deployable function assets.
//!
//! The provisioning framework treats an asset as a content-addressed build
//! object with two questions: "what is your hash?" and "build yourself into
//! this directory". [`LocalBundling`] is that contract; [`FunctionAsset`]
//! answers it for one build target by pairing a [`Hasher`] with a
//! [`LocalCompiler`].
//!
//! # Submodules
//!
//! - [`container`] - Image build context generation

pub mod container;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::compile::{Artifact, BuildError, BuildOptions, LocalCompiler};
use crate::config::{ConfigError, HostEnv};
use crate::consts::{BINARY_NAME, FUNCTION_RUNTIME};
use crate::hash::source::SourceLayout;
use crate::hash::{ContentDigest, HashError, Hasher};
use crate::target::BuildTarget;
use crate::toolchain::{DependencyLister, GoToolchain};

/// Local-build capability handed to the provisioning framework.
pub trait LocalBundling {
  /// Content key deciding whether the asset must be re-uploaded.
  fn asset_hash(&self) -> Result<ContentDigest, HashError>;

  /// Build the asset into `output_dir`. Failure detail is logged; the
  /// framework only receives the outcome.
  fn try_bundle(&self, output_dir: &Path) -> bool;
}

#[derive(Debug, Error)]
pub enum AssetError {
  #[error(transparent)]
  Hash(#[from] HashError),

  #[error(transparent)]
  Build(#[from] BuildError),
}

/// Serializable description of a bundled function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
  pub function_name: String,
  pub target: String,
  pub hash: ContentDigest,
  pub handler: String,
  pub runtime: String,
  pub architecture: String,
  pub platform: String,
  pub artifact: Artifact,
}

/// One deployable function built from Go sources.
pub struct FunctionAsset<L = GoToolchain> {
  target: BuildTarget,
  host: HostEnv,
  layout: Option<SourceLayout>,
  hasher: Hasher<L>,
  compiler: LocalCompiler,
}

impl FunctionAsset<GoToolchain> {
  /// Validate the build configuration and wire the hasher and compiler.
  ///
  /// Dependencies are listed under the same `GOOS`/`GOARCH`/`CGO_ENABLED`
  /// and build tags the compiler uses, so the closure matches what gets built.
  pub fn new(target: BuildTarget, options: BuildOptions, host: HostEnv) -> Result<Self, ConfigError> {
    let mut compiler = LocalCompiler::new(target.clone(), options, &host)?;
    if compiler.workdir().is_none() {
      // Without a locatable root the toolchain runs in the current directory.
      if let Ok(layout) = SourceLayout::locate(&target, &host) {
        compiler = compiler.with_workdir(layout.root());
      }
    }

    let lister = GoToolchain::new()
      .with_list_env(compiler.environment().constraint_vars())
      .with_tags(compiler.tags().to_vec());
    Ok(Self {
      target,
      host,
      layout: None,
      hasher: Hasher::new(lister),
      compiler,
    })
  }

  /// Use a specific toolchain binary for both listing and building.
  pub fn with_toolchain(mut self, program: impl Into<PathBuf>) -> Self {
    let program = program.into();
    let lister = GoToolchain::new()
      .with_program(&program)
      .with_list_env(self.compiler.environment().constraint_vars())
      .with_tags(self.compiler.tags().to_vec());
    self.hasher = self.hasher.with_lister(lister);
    self.compiler = self.compiler.with_toolchain(program);
    self
  }
}

impl<L: DependencyLister> FunctionAsset<L> {
  /// Assemble an asset from pre-built parts.
  pub fn from_parts(target: BuildTarget, host: HostEnv, hasher: Hasher<L>, compiler: LocalCompiler) -> Self {
    Self {
      target,
      host,
      layout: None,
      hasher,
      compiler,
    }
  }

  /// Pin the module source root instead of locating it from host signals.
  pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
    let layout = SourceLayout::new(self.target.module(), root);
    self.compiler = self.compiler.with_workdir(layout.root());
    self.layout = Some(layout);
    self
  }

  pub fn verbose(mut self, verbose: bool) -> Self {
    self.hasher = self.hasher.verbose(verbose);
    self
  }

  pub fn target(&self) -> &BuildTarget {
    &self.target
  }

  pub fn compiler(&self) -> &LocalCompiler {
    &self.compiler
  }

  /// Source layout in effect for this asset.
  pub fn layout(&self) -> Result<SourceLayout, HashError> {
    match &self.layout {
      Some(layout) => Ok(layout.clone()),
      None => SourceLayout::locate(&self.target, &self.host),
    }
  }

  /// Build with structured errors.
  pub fn bundle(&self, output_dir: &Path) -> Result<Artifact, BuildError> {
    self.compiler.try_build(output_dir)
  }

  /// Hash, build and describe the asset in one pass.
  pub fn package(&self, output_dir: &Path, stack_name: Option<&str>) -> Result<AssetManifest, AssetError> {
    let hash = self.asset_hash()?;
    let artifact = self.bundle(output_dir)?;
    Ok(self.manifest(hash, artifact, stack_name))
  }

  pub fn manifest(&self, hash: ContentDigest, artifact: Artifact, stack_name: Option<&str>) -> AssetManifest {
    let platform = self.compiler.platform();
    AssetManifest {
      function_name: function_name(&self.target, stack_name),
      target: self.target.to_string(),
      hash,
      handler: BINARY_NAME.to_string(),
      runtime: FUNCTION_RUNTIME.to_string(),
      architecture: platform.arch.function_architecture().to_string(),
      platform: platform.container(),
      artifact,
    }
  }
}

impl<L: DependencyLister> LocalBundling for FunctionAsset<L> {
  fn asset_hash(&self) -> Result<ContentDigest, HashError> {
    let layout = self.layout()?;
    self.hasher.hash(&self.target, &layout)
  }

  fn try_bundle(&self, output_dir: &Path) -> bool {
    match self.bundle(output_dir) {
      Ok(_) => true,
      Err(e) => {
        error!(target_package = %self.target, error = %e, "bundling failed");
        false
      }
    }
  }
}

/// `<stack>-<base name>`, or the bare base name without a stack.
pub fn function_name(target: &BuildTarget, stack_name: Option<&str>) -> String {
  match stack_name {
    Some(stack) if !stack.is_empty() => format!("{}-{}", stack, target.base_name()),
    _ => target.base_name().to_string(),
  }
}
