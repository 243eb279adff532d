use anyhow::Result;
use serde_json::json;

use scud_lib::config::HostEnv;
use scud_lib::platform::{Platform, host_triple};
use scud_lib::platform::arch::TargetArch;

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let host = HostEnv::capture();
  let target = Platform::new("linux", TargetArch::default());
  let workspace = host.workspace_root().map(|p| p.display().to_string());
  let gopath = host.gopath().map(|p| p.display().to_string());

  if output.is_json() {
    print_json(&json!({
      "version": env!("CARGO_PKG_VERSION"),
      "host": host_triple(),
      "default_target": target.container(),
      "ci": host.is_ci(),
      "compress": host.compress_enabled(),
      "workspace": workspace,
      "gopath": gopath,
    }))?;
  } else {
    println!("scud {}", env!("CARGO_PKG_VERSION"));
    print_stat("Host", &host_triple());
    print_stat("Default target", &target.container());
    print_stat("CI", if host.is_ci() { "yes" } else { "no" });
    print_stat("Compression", if host.compress_enabled() { "upx" } else { "off" });
    print_stat("Workspace", workspace.as_deref().unwrap_or("-"));
    print_stat("GOPATH", gopath.as_deref().unwrap_or("-"));
  }

  Ok(())
}
