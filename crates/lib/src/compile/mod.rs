//! Local compilation of build targets.
//!
//! A [`LocalCompiler`] turns one [`BuildTarget`] into a single static
//! executable by invoking the external toolchain:
//!
//! ```text
//! go build -tags lambda.norpc -ldflags "-s -w -X main.version=v1" -o <out>/bootstrap <package>
//! ```
//!
//! The compiler keeps no state between calls and never retries.
//!
//! # Submodules
//!
//! - [`compress`] - Optional `upx` post-processing
//! - [`env`] - Layered toolchain environment

pub mod compress;
pub mod env;
mod types;

pub use types::*;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{ConfigError, HostEnv};
use crate::consts::VERSION_SYMBOL;
use crate::hash::digest::sha256_file;
use crate::platform::Platform;
use crate::target::BuildTarget;

use compress::Compressor;
use env::BuildEnvironment;

pub struct LocalCompiler {
  target: BuildTarget,
  options: BuildOptions,
  env: BuildEnvironment,
  platform: Platform,
  toolchain: PathBuf,
  compressor: Option<Compressor>,
}

impl LocalCompiler {
  /// Resolve the build environment and validate the target platform.
  pub fn new(target: BuildTarget, options: BuildOptions, host: &HostEnv) -> Result<Self, ConfigError> {
    let version = target.version().map(|v| (VERSION_SYMBOL, v));
    let vars = options.vars.iter().map(|(name, value)| (name.as_str(), value.as_str()));
    if let Some((name, _)) = version.into_iter().chain(vars).find(|(_, value)| quote_for_link(value).is_none()) {
      return Err(ConfigError::UnquotableVar(name.to_string()));
    }

    let env = BuildEnvironment::resolve(&options.env, host);
    let platform = env.platform()?;
    let compressor = options
      .compress
      .unwrap_or_else(|| host.compress_enabled())
      .then(Compressor::default);

    Ok(Self {
      target,
      options,
      env,
      platform,
      toolchain: PathBuf::from("go"),
      compressor,
    })
  }

  /// Use a specific toolchain binary instead of `go` from `PATH`.
  pub fn with_toolchain(mut self, program: impl Into<PathBuf>) -> Self {
    self.toolchain = program.into();
    self
  }

  /// Run the toolchain in `workdir` (normally the module source root).
  pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
    self.options.workdir = Some(workdir.into());
    self
  }

  pub fn workdir(&self) -> Option<&Path> {
    self.options.workdir.as_deref()
  }

  /// Replace the compressor. Only used when compression is enabled.
  pub fn with_compressor(mut self, compressor: Compressor) -> Self {
    if self.compressor.is_some() {
      self.compressor = Some(compressor);
    }
    self
  }

  pub fn target(&self) -> &BuildTarget {
    &self.target
  }

  pub fn environment(&self) -> &BuildEnvironment {
    &self.env
  }

  pub fn platform(&self) -> &Platform {
    &self.platform
  }

  /// Build constraints passed as `-tags`.
  pub fn tags(&self) -> &[String] {
    &self.options.tags
  }

  pub fn compresses(&self) -> bool {
    self.compressor.is_some()
  }

  pub fn artifact_path(&self, out_dir: &Path) -> PathBuf {
    out_dir.join(&self.options.binary_name)
  }

  /// Linker flags: strip symbols, then inject the version and caller
  /// variables in name order.
  pub fn ldflags(&self) -> String {
    let mut flags = vec!["-s".to_string(), "-w".to_string()];
    if let Some(version) = self.target.version() {
      flags.push(link_var(VERSION_SYMBOL, version));
    }
    for (name, value) in &self.options.vars {
      flags.push(link_var(name, value));
    }
    flags.join(" ")
  }

  pub fn build_args(&self, out_dir: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["build".into()];
    if !self.options.tags.is_empty() {
      args.push("-tags".into());
      args.push(self.options.tags.join(",").into());
    }
    args.push("-ldflags".into());
    args.push(self.ldflags().into());
    args.push("-o".into());
    args.push(self.artifact_path(out_dir).into_os_string());
    args.push(self.target.package_path().into());
    args
  }

  /// Compile the target into `out_dir`.
  ///
  /// Toolchain output streams straight through to this process.
  pub fn try_build(&self, out_dir: &Path) -> Result<Artifact, BuildError> {
    let started = Instant::now();
    let package = self.target.package_path();
    let artifact = self.artifact_path(out_dir);

    fs::create_dir_all(out_dir)?;
    remove_stale(&artifact)?;

    let mut command = Command::new(&self.toolchain);
    command.args(self.build_args(out_dir)).env_clear().envs(self.env.iter());
    if let Some(workdir) = &self.options.workdir {
      command.current_dir(workdir);
    }

    debug!(program = ?self.toolchain, package = %package, out_dir = ?out_dir, "spawning build");

    let status = command.status().map_err(|source| BuildError::Spawn {
      program: self.toolchain.display().to_string(),
      source,
    })?;

    if !status.success() {
      warn!(package = %package, code = ?status.code(), "build failed");
      return Err(BuildError::Failed {
        package,
        code: status.code(),
      });
    }

    if !artifact.is_file() {
      return Err(BuildError::MissingArtifact { package, path: artifact });
    }

    info!(package = %package, elapsed = ?started.elapsed(), "==> go build");

    if let Some(compressor) = &self.compressor {
      if let Err(e) = compressor.compress(&artifact) {
        remove_stale(&artifact)?;
        return Err(e);
      }
    }

    let size = fs::metadata(&artifact)?.len();
    let sha256 = sha256_file(&artifact)?;

    Ok(Artifact {
      path: artifact,
      size,
      sha256,
      compressed: self.compressor.is_some(),
    })
  }
}

/// One `-X` assignment. The linker splits its flag string on spaces and
/// honours single or double quotes, so values holding whitespace are quoted.
fn link_var(name: &str, value: &str) -> String {
  let assignment = format!("{}={}", name, value);
  match quote_for_link(value) {
    Some(quote) => format!("-X {quote}{assignment}{quote}"),
    None => format!("-X \"{assignment}\""),
  }
}

/// Quote character needed around a value, `Some("")` when none is.
/// `None` when the value cannot be quoted at all.
fn quote_for_link(value: &str) -> Option<&'static str> {
  if !value.chars().any(char::is_whitespace) {
    Some("")
  } else if !value.contains('\'') {
    Some("'")
  } else if !value.contains('"') {
    Some("\"")
  } else {
    None
  }
}

/// Make sure a failed build cannot leave an older executable behind.
fn remove_stale(artifact: &Path) -> io::Result<()> {
  match fs::remove_file(artifact) {
    Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
    _ => Ok(()),
  }
}
