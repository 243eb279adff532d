//! Content fingerprinting of build targets.
//!
//! A target's digest covers the header record (module, entry, version) and
//! every source and module-descriptor file of each in-module package the
//! entry point transitively imports. Identical trees always produce identical
//! digests; any byte change inside the closure produces a different one.
//!
//! # Submodules
//!
//! - [`closure`] - In-module dependency closure
//! - [`digest`] - Framed incremental SHA-256
//! - [`source`] - Import path to directory mapping and file selection

pub mod closure;
pub mod digest;
pub mod source;
mod types;

pub use types::*;

use std::time::Instant;

use tracing::info;

use crate::consts::{DESCRIPTOR_EXTENSIONS, DIGEST_PREFIX_LEN};
use crate::target::BuildTarget;
use crate::toolchain::{DependencyLister, GoToolchain};

use closure::DependencyClosure;
use digest::DigestWriter;
use source::{SourceFilter, SourceLayout};

/// Computes content digests for build targets.
///
/// Holds no per-target state: every call resolves the closure afresh.
#[derive(Debug, Clone)]
pub struct Hasher<L = GoToolchain> {
  lister: L,
  filter: SourceFilter,
  descriptors: SourceFilter,
  verbose: bool,
}

impl Default for Hasher<GoToolchain> {
  fn default() -> Self {
    Self::new(GoToolchain::default())
  }
}

impl<L: DependencyLister> Hasher<L> {
  pub fn new(lister: L) -> Self {
    Self {
      lister,
      filter: SourceFilter::default(),
      descriptors: SourceFilter::new(DESCRIPTOR_EXTENSIONS.iter().copied()),
      verbose: false,
    }
  }

  /// Also log the closure members after each digest.
  pub fn verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }

  /// Swap the dependency lister, keeping filters and verbosity.
  pub fn with_lister<M: DependencyLister>(self, lister: M) -> Hasher<M> {
    Hasher {
      lister,
      filter: self.filter,
      descriptors: self.descriptors,
      verbose: self.verbose,
    }
  }

  /// Replace the per-package file selection and the module-root
  /// descriptor selection.
  pub fn with_filters(mut self, sources: SourceFilter, descriptors: SourceFilter) -> Self {
    self.filter = sources;
    self.descriptors = descriptors;
    self
  }

  /// Compute the content digest of `target`.
  pub fn hash(&self, target: &BuildTarget, layout: &SourceLayout) -> Result<ContentDigest, HashError> {
    let started = Instant::now();

    let closure = DependencyClosure::resolve(target, layout, &self.lister)?;
    let digest = self.digest_closure(target, layout, &closure)?;

    info!(
      checksum = %digest.short(DIGEST_PREFIX_LEN),
      entry = %target.entry(),
      elapsed = ?started.elapsed(),
      "==> checksum"
    );

    if self.verbose {
      let deps = closure.dependencies();
      for (i, package) in deps.iter().enumerate() {
        let branch = if i + 1 == deps.len() { "└─" } else { "├─" };
        info!("    {} {}", branch, package);
      }
    }

    Ok(digest)
  }

  /// Fold the files of an already resolved closure into a digest.
  pub fn digest_closure(
    &self,
    target: &BuildTarget,
    layout: &SourceLayout,
    closure: &DependencyClosure,
  ) -> Result<ContentDigest, HashError> {
    let mut writer = DigestWriter::new(target);

    for package in closure.packages() {
      let dir = layout.package_dir(package);
      for (name, path) in self.filter.package_files(package, &dir)? {
        writer.write_file(&format!("{}/{}", package, name), &path)?;
      }
    }

    // Dependency manifests pin external versions; they count even when the
    // module root is not itself an imported package.
    let module = layout.module();
    if !closure.packages().iter().any(|p| p == module) {
      for (name, path) in self.descriptors.package_files(module, layout.root())? {
        writer.write_file(&format!("{}/{}", module, name), &path)?;
      }
    }

    Ok(writer.finish())
  }
}
