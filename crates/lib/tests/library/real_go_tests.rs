//! End-to-end checks against an installed Go toolchain. Each test returns
//! early when `go` is not on `PATH`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use scud_lib::asset::{FunctionAsset, LocalBundling};
use scud_lib::compile::BuildOptions;
use scud_lib::config::HostEnv;
use scud_lib::target::BuildTarget;
use serial_test::serial;
use tempfile::TempDir;

use super::common::{MODULE, ModuleTree};

fn find_go() -> Option<PathBuf> {
  let path = std::env::var_os("PATH")?;
  std::env::split_paths(&path).map(|dir| dir.join("go")).find(|p| p.is_file())
}

fn asset(tree: &ModuleTree, version: Option<&str>) -> FunctionAsset {
  let target = BuildTarget::new(MODULE, "cmd/hello", version).unwrap();
  FunctionAsset::new(target, BuildOptions::default().with_compress(false), HostEnv::capture())
    .unwrap()
    .with_source_root(tree.root())
}

#[test]
#[serial]
fn hashes_and_builds_with_real_toolchain() {
  if find_go().is_none() {
    eprintln!("go not found on PATH; skipping");
    return;
  }

  let tree = ModuleTree::hello();
  let out = TempDir::new().unwrap();
  let asset = asset(&tree, Some("v0.0.1"));

  let before = asset.asset_hash().unwrap();
  assert_eq!(before, asset.asset_hash().unwrap());

  tree.write("internal/unused/unused.go", "package unused\n\nvar Y = 2\n");
  assert_eq!(before, asset.asset_hash().unwrap());

  tree.write(
    "internal/greet/greet.go",
    "package greet\n\nimport \"fmt\"\n\nfunc Hello() { fmt.Println(\"hi\") }\n",
  );
  assert_ne!(before, asset.asset_hash().unwrap());

  assert!(asset.try_bundle(out.path()));
  let bootstrap = out.path().join("bootstrap");
  assert!(bootstrap.is_file());
  assert_ne!(fs::metadata(&bootstrap).unwrap().permissions().mode() & 0o111, 0);
}

#[test]
#[serial]
fn compile_error_fails_bundle() {
  if find_go().is_none() {
    return;
  }

  let tree = ModuleTree::hello();
  tree.write("cmd/hello/main.go", "package main\n\nfunc main() { undefined() }\n");
  let out = TempDir::new().unwrap();

  assert!(!asset(&tree, None).try_bundle(out.path()));
  assert!(!out.path().join("bootstrap").exists());
}

#[test]
#[serial]
fn syntax_error_fails_bundle() {
  if find_go().is_none() {
    return;
  }

  let tree = ModuleTree::hello();
  tree.write("cmd/hello/main.go", "package main\n\nfunc main() {\n");
  let out = TempDir::new().unwrap();

  assert!(!asset(&tree, None).try_bundle(out.path()));
  assert!(!out.path().join("bootstrap").exists());
}
