//! Arguments shared by every command that operates on a build target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scud_lib::asset::FunctionAsset;
use scud_lib::compile::BuildOptions;
use scud_lib::config::HostEnv;
use scud_lib::target::BuildTarget;

#[derive(Debug, Args)]
pub struct TargetArgs {
  /// Go module path (e.g. github.com/acme/app)
  pub module: String,

  /// Entry package, relative to the module root (e.g. cmd/api)
  pub entry: String,

  /// Version injected as main.version and folded into the hash
  #[arg(long)]
  pub version: Option<String>,

  /// Module source root (default: $GITHUB_WORKSPACE, else $GOPATH/src/<module>)
  #[arg(long)]
  pub source_root: Option<PathBuf>,

  /// Go toolchain binary
  #[arg(long, default_value = "go")]
  pub toolchain: PathBuf,

  /// Link-time variable as NAME=VALUE (repeatable)
  #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_val)]
  pub vars: Vec<(String, String)>,

  /// Toolchain environment override as KEY=VALUE (repeatable)
  #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
  pub env: Vec<(String, String)>,

  /// Extra build tag, added to lambda.norpc (repeatable)
  #[arg(long = "tag", value_name = "TAG")]
  pub tags: Vec<String>,

  /// Compress the executable with upx regardless of SCUD_COMPRESS_UPX
  #[arg(long, conflicts_with = "no_compress")]
  pub compress: bool,

  /// Never compress the executable
  #[arg(long)]
  pub no_compress: bool,
}

impl TargetArgs {
  pub fn build_target(&self) -> Result<BuildTarget> {
    BuildTarget::new(&self.module, &self.entry, self.version.as_deref()).context("Invalid build target")
  }

  pub fn build_options(&self) -> BuildOptions {
    let mut options = BuildOptions::default();
    for (name, value) in &self.vars {
      options = options.with_var(name, value);
    }
    for (name, value) in &self.env {
      options = options.with_env(name, value);
    }
    for tag in &self.tags {
      options = options.with_tag(tag);
    }
    if self.compress {
      options = options.with_compress(true);
    } else if self.no_compress {
      options = options.with_compress(false);
    }
    options
  }

  /// Wire a function asset from the arguments and the captured host.
  pub fn asset(&self, verbose: bool) -> Result<FunctionAsset> {
    let asset = FunctionAsset::new(self.build_target()?, self.build_options(), HostEnv::capture())
      .context("Invalid build configuration")?
      .with_toolchain(&self.toolchain)
      .verbose(verbose);

    Ok(match &self.source_root {
      Some(root) => asset.with_source_root(root),
      None => asset,
    })
  }
}

/// Explicit output directory, or one keyed by the target's identity under
/// the system temp dir.
pub fn resolve_out_dir(asset: &FunctionAsset, out_dir: Option<PathBuf>) -> PathBuf {
  out_dir.unwrap_or_else(|| asset.target().staging_dir(&std::env::temp_dir()))
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
  let Some((key, value)) = s.split_once('=') else {
    return Err(format!("expected KEY=VALUE, got '{}'", s));
  };
  if key.is_empty() {
    return Err(format!("empty key in '{}'", s));
  }
  Ok((key.to_string(), value.to_string()))
}
