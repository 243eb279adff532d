//! Implementation of the `scud build` command.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use super::TargetArgs;
use super::args::resolve_out_dir;
use crate::output::{OutputFormat, format_bytes, format_duration, print_json, print_stat, print_success, truncate_hash};

pub fn cmd_build(args: &TargetArgs, out_dir: Option<PathBuf>, verbose: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let asset = args.asset(verbose)?;
  let out_dir = resolve_out_dir(&asset, out_dir);

  let artifact = asset
    .bundle(&out_dir)
    .with_context(|| format!("Failed to build {}", asset.target()))?;

  if output.is_json() {
    print_json(&artifact)?;
  } else {
    print_success(&format!("Built {}", asset.target()));
    print_stat("Artifact", &artifact.path.display().to_string());
    print_stat("Size", &format_bytes(artifact.size));
    print_stat("SHA-256", truncate_hash(&artifact.sha256));
    if artifact.compressed {
      print_stat("Compressed", "yes");
    }
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
