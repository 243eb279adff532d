//! Transitive in-module dependency closure.

use std::collections::HashSet;

use super::source::SourceLayout;
use super::types::HashError;
use crate::target::BuildTarget;
use crate::toolchain::DependencyLister;

/// Ordered in-module packages feeding a digest.
///
/// The first entry is always the target's own package; the rest follow in
/// toolchain discovery order with duplicates dropped. Packages outside the
/// module are excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyClosure {
  packages: Vec<String>,
}

impl DependencyClosure {
  /// Ask the toolchain for the target's imports and keep the in-module ones.
  pub fn resolve(
    target: &BuildTarget,
    layout: &SourceLayout,
    lister: &dyn DependencyLister,
  ) -> Result<Self, HashError> {
    let deps = lister.list_deps(&target.package_path(), layout.root())?;
    Ok(Self::from_listing(target, layout, deps))
  }

  pub fn from_listing(target: &BuildTarget, layout: &SourceLayout, deps: impl IntoIterator<Item = String>) -> Self {
    let own = target.package_path();
    let mut seen = HashSet::from([own.clone()]);
    let mut packages = vec![own];

    for dep in deps {
      if layout.contains(&dep) && seen.insert(dep.clone()) {
        packages.push(dep);
      }
    }

    Self { packages }
  }

  pub fn packages(&self) -> &[String] {
    &self.packages
  }

  /// Everything except the target's own package.
  pub fn dependencies(&self) -> &[String] {
    &self.packages[1..]
  }

  pub fn len(&self) -> usize {
    self.packages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.packages.is_empty()
  }
}
