//! Implementation of the `scud hash` command.

use anyhow::{Context, Result};
use serde_json::json;

use scud_lib::asset::LocalBundling;

use super::TargetArgs;
use crate::output::{OutputFormat, print_json};

/// Print the content hash of a build target.
///
/// Text output is the bare 64-character digest on stdout so the command can
/// be used in scripts; progress goes to stderr through the log.
pub fn cmd_hash(args: &TargetArgs, verbose: bool, output: OutputFormat) -> Result<()> {
  let asset = args.asset(verbose)?;
  let hash = asset.asset_hash().context("Failed to hash build target")?;

  if output.is_json() {
    print_json(&json!({ "target": asset.target().to_string(), "hash": hash }))?;
  } else {
    println!("{}", hash);
  }

  Ok(())
}
