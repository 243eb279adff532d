//! Toolchain environment resolution.
//!
//! Precedence, highest first:
//! - caller overrides
//! - variables inherited from the host (`PATH`, `GOPATH`, `GOROOT`, `GOMODCACHE`, `HOME`)
//! - hard defaults (`GOOS=linux`, `GOARCH=arm64`, `CGO_ENABLED=0`)
//!
//! `GOCACHE` is derived last: the host cache under CI, otherwise a scratch
//! path per architecture.

use std::collections::BTreeMap;

use crate::config::{ConfigError, HostEnv};
use crate::consts::env;
use crate::platform::Platform;
use crate::platform::arch::TargetArch;

const INHERITED: &[&str] = &[env::PATH, env::GOPATH, env::GOROOT, env::GOMODCACHE, env::HOME];

const DEFAULTS: &[(&str, &str)] = &[(env::GOOS, "linux"), (env::GOARCH, "arm64"), (env::CGO_ENABLED, "0")];

/// The exact variable set handed to the toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnvironment {
  vars: BTreeMap<String, String>,
}

impl BuildEnvironment {
  pub fn resolve(overrides: &BTreeMap<String, String>, host: &HostEnv) -> Self {
    let mut vars = overrides.clone();

    for name in INHERITED {
      if let Some(value) = host.get(name) {
        vars.entry(name.to_string()).or_insert_with(|| value.to_string());
      }
    }

    for (name, value) in DEFAULTS {
      vars.entry(name.to_string()).or_insert_with(|| value.to_string());
    }

    if !vars.contains_key(env::GOCACHE) {
      let cache = build_cache(host, &vars[env::GOARCH]);
      vars.insert(env::GOCACHE.to_string(), cache);
    }

    Self { vars }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.vars.get(name).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn vars(&self) -> &BTreeMap<String, String> {
    &self.vars
  }

  /// Target architecture. Values other than `amd64`/`arm64` are rejected
  /// rather than silently deployed under the default architecture.
  pub fn arch(&self) -> Result<TargetArch, ConfigError> {
    let value = self.get(env::GOARCH).unwrap_or_default();
    TargetArch::from_goarch(value).ok_or_else(|| ConfigError::UnsupportedArch(value.to_string()))
  }

  pub fn platform(&self) -> Result<Platform, ConfigError> {
    Ok(Platform::new(self.get(env::GOOS).unwrap_or("linux"), self.arch()?))
  }

  /// Variables that change which files a package compiles, for use when
  /// listing dependencies.
  pub fn constraint_vars(&self) -> BTreeMap<String, String> {
    [env::GOOS, env::GOARCH, env::CGO_ENABLED]
      .iter()
      .filter_map(|name| self.get(name).map(|v| (name.to_string(), v.to_string())))
      .collect()
  }
}

fn build_cache(host: &HostEnv, goarch: &str) -> String {
  match host.get(env::GOCACHE) {
    Some(cache) if host.is_ci() => cache.to_string(),
    _ => format!("/tmp/go.{}", goarch),
  }
}
