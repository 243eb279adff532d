use std::fs;
use std::os::unix::fs::PermissionsExt;

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn build_writes_artifact() {
  let env = TestEnv::new();
  env
    .target_cmd("build")
    .arg("--out-dir")
    .arg(env.out_dir())
    .assert()
    .success()
    .stdout(predicate::str::contains("Built example.com/demo/cmd/hello"));

  let bootstrap = env.out_dir().join("bootstrap");
  assert_eq!(fs::read(&bootstrap).unwrap(), b"fake-elf");
  assert_ne!(fs::metadata(&bootstrap).unwrap().permissions().mode() & 0o111, 0);
}

#[test]
#[serial]
fn build_passes_environment_overrides() {
  let env = TestEnv::new();
  env
    .target_cmd("build")
    .args(["--env", "GOARCH=amd64", "--out-dir"])
    .arg(env.out_dir())
    .assert()
    .success();

  let build_env = env.build_env();
  assert!(build_env.contains("GOARCH=amd64"));
  assert!(build_env.contains("GOOS=linux"));
  assert!(build_env.contains("CGO_ENABLED=0"));
}

#[test]
#[serial]
fn failed_build_exits_nonzero() {
  let env = TestEnv::new();
  env.fail_builds();
  env
    .target_cmd("build")
    .arg("--out-dir")
    .arg(env.out_dir())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to build"));

  assert!(!env.out_dir().join("bootstrap").exists());
}

#[test]
#[serial]
fn bundle_writes_manifest() {
  let env = TestEnv::new();
  let output = env
    .target_cmd("bundle")
    .args(["--stack", "demo", "--output", "json", "--out-dir"])
    .arg(env.out_dir())
    .output()
    .unwrap();
  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["function_name"], "demo-hello");
  assert_eq!(value["runtime"], "provided.al2");

  let written: serde_json::Value =
    serde_json::from_str(&fs::read_to_string(env.out_dir().join("asset.json")).unwrap()).unwrap();
  assert_eq!(written, value);
}

#[test]
#[serial]
fn container_stages_build_context() {
  let env = TestEnv::new();
  env.write_file("src/static/index.html", "<html/>");
  env
    .target_cmd("container")
    .args(["--asset", "static/index.html", "--out-dir"])
    .arg(env.out_dir())
    .assert()
    .success()
    .stdout(predicate::str::contains("linux/arm64"));

  let dockerfile = fs::read_to_string(env.out_dir().join("Dockerfile")).unwrap();
  assert!(dockerfile.contains("ADD static/index.html /opt/static/index.html"));
  assert!(env.out_dir().join("static/index.html").is_file());
}

#[test]
#[serial]
fn container_rejects_packages_on_scratch() {
  let env = TestEnv::new();
  env
    .target_cmd("container")
    .args(["--package", "ca-certificates", "--out-dir"])
    .arg(env.out_dir())
    .assert()
    .failure()
    .stderr(predicate::str::contains("no package manager"));
}
