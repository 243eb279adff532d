//! Implementation of the `scud container` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use scud_lib::asset::container::{ContainerSpec, stage_container};

use super::TargetArgs;
use super::args::resolve_out_dir;
use crate::output::{OutputFormat, print_json, print_stat, print_success};

pub struct ContainerArgs {
  pub base_image: String,
  pub packages: Vec<String>,
  pub assets: Vec<String>,
}

impl From<ContainerArgs> for ContainerSpec {
  fn from(args: ContainerArgs) -> Self {
    ContainerSpec {
      base_image: args.base_image,
      packages: args.packages,
      static_assets: args.assets,
    }
  }
}

pub fn cmd_container(
  args: &TargetArgs,
  out_dir: Option<PathBuf>,
  container: ContainerArgs,
  verbose: bool,
  output: OutputFormat,
) -> Result<()> {
  let asset = args.asset(verbose)?;
  let out_dir = resolve_out_dir(&asset, out_dir);
  let spec = ContainerSpec::from(container);

  let image = stage_container(&asset, &spec, &out_dir)
    .with_context(|| format!("Failed to stage container for {}", asset.target()))?;

  if output.is_json() {
    print_json(&image)?;
  } else {
    print_success(&format!("Staged build context for {}", asset.target()));
    print_stat("Context", &image.context_dir.display().to_string());
    print_stat("Dockerfile", &image.dockerfile.display().to_string());
    print_stat("Platform", &image.platform);
    if !spec.static_assets.is_empty() {
      print_stat("Assets", &spec.static_assets.join(", "));
    }
  }

  Ok(())
}
