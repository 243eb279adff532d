//! Implementation of the `scud bundle` command.
//!
//! Does what a provisioning framework does with an asset: asks for its hash,
//! builds it, and records the function description next to the artifact.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use super::TargetArgs;
use super::args::resolve_out_dir;
use crate::output::{OutputFormat, format_bytes, format_duration, print_json, print_stat, print_success, truncate_hash};

/// File written next to the artifact.
const MANIFEST_FILE: &str = "asset.json";

pub fn cmd_bundle(
  args: &TargetArgs,
  out_dir: Option<PathBuf>,
  stack: Option<&str>,
  verbose: bool,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();
  let asset = args.asset(verbose)?;
  let out_dir = resolve_out_dir(&asset, out_dir);

  let manifest = asset
    .package(&out_dir, stack)
    .with_context(|| format!("Failed to bundle {}", asset.target()))?;

  let manifest_path = out_dir.join(MANIFEST_FILE);
  let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize asset manifest")?;
  fs::write(&manifest_path, json).with_context(|| format!("Failed to write {}", manifest_path.display()))?;
  debug!(path = %manifest_path.display(), "asset manifest written");

  if output.is_json() {
    print_json(&manifest)?;
  } else {
    print_success(&format!("Bundled {}", manifest.function_name));
    print_stat("Hash", truncate_hash(manifest.hash.as_str()));
    print_stat("Runtime", &manifest.runtime);
    print_stat("Architecture", &manifest.architecture);
    print_stat("Artifact", &manifest.artifact.path.display().to_string());
    print_stat("Size", &format_bytes(manifest.artifact.size));
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
