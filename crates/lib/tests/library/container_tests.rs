use std::fs;

use scud_lib::asset::FunctionAsset;
use scud_lib::asset::container::{ContainerError, ContainerSpec, stage_container};
use scud_lib::compile::BuildOptions;
use scud_lib::target::BuildTarget;
use serial_test::serial;
use tempfile::TempDir;

use super::common::{FakeGo, MODULE, ModuleTree, host_with_path};

fn asset(go: &FakeGo, tree: &ModuleTree, options: BuildOptions) -> FunctionAsset {
  let target = BuildTarget::new(MODULE, "cmd/hello", None).unwrap();
  FunctionAsset::new(target, options, host_with_path())
    .unwrap()
    .with_toolchain(&go.program)
    .with_source_root(tree.root())
}

#[test]
#[serial]
fn stages_binary_assets_and_dockerfile() {
  let go = FakeGo::new();
  let tree = ModuleTree::hello();
  tree.write("static/index.html", "<html/>");
  let staging = TempDir::new().unwrap();
  let spec = ContainerSpec::default().with_asset("static/index.html");

  let image = stage_container(&asset(&go, &tree, BuildOptions::default()), &spec, staging.path()).unwrap();

  assert_eq!(image.context_dir, staging.path());
  assert!(staging.path().join("bootstrap").is_file());
  assert_eq!(
    fs::read_to_string(staging.path().join("static/index.html")).unwrap(),
    "<html/>"
  );

  let dockerfile = fs::read_to_string(&image.dockerfile).unwrap();
  assert_eq!(
    dockerfile,
    "FROM scratch\n\nADD bootstrap /bin/bootstrap\nADD static/index.html /opt/static/index.html\n\nCMD [\"/bin/bootstrap\"]\n"
  );
}

#[test]
#[serial]
fn platform_follows_target_architecture() {
  let go = FakeGo::new();
  let tree = ModuleTree::hello();
  let staging = TempDir::new().unwrap();
  let options = BuildOptions::default().with_env("GOARCH", "amd64");

  let image = stage_container(&asset(&go, &tree, options), &ContainerSpec::default(), staging.path()).unwrap();

  assert_eq!(image.platform, "linux/amd64");
  assert_eq!(image.build_args.get("platform").map(String::as_str), Some("linux/amd64"));
}

#[test]
#[serial]
fn invalid_spec_is_rejected_before_building() {
  let go = FakeGo::new();
  let tree = ModuleTree::hello();
  let staging = TempDir::new().unwrap();
  let spec = ContainerSpec::default().with_asset("../outside.txt");

  let err = stage_container(&asset(&go, &tree, BuildOptions::default()), &spec, staging.path()).unwrap_err();

  assert!(matches!(err, ContainerError::InvalidAsset(_)));
  assert!(!staging.path().join("bootstrap").exists());
}

#[test]
#[serial]
fn build_failure_surfaces_as_build_error() {
  let go = FakeGo::new();
  go.fail_builds();
  let tree = ModuleTree::hello();
  let staging = TempDir::new().unwrap();

  let err = stage_container(
    &asset(&go, &tree, BuildOptions::default()),
    &ContainerSpec::default(),
    staging.path(),
  )
  .unwrap_err();

  assert!(matches!(err, ContainerError::Build(_)));
  assert!(!staging.path().join("Dockerfile").exists());
}

#[test]
#[serial]
fn missing_static_asset_is_copy_error() {
  let go = FakeGo::new();
  let tree = ModuleTree::hello();
  let staging = TempDir::new().unwrap();
  let spec = ContainerSpec::default().with_asset("config/missing.json");

  let err = stage_container(&asset(&go, &tree, BuildOptions::default()), &spec, staging.path()).unwrap_err();

  assert!(matches!(err, ContainerError::CopyAsset { ref asset, .. } if asset == "config/missing.json"));
}
