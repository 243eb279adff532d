use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

fn hash_of(env: &TestEnv, extra: &[&str]) -> String {
  let output = env.target_cmd("hash").args(extra).output().unwrap();
  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
#[serial]
fn hash_prints_hex_digest() {
  let env = TestEnv::new();

  let hash = hash_of(&env, &[]);

  assert_eq!(hash.len(), 64);
  assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
#[serial]
fn hash_logs_progress_to_stderr() {
  let env = TestEnv::new();
  env
    .target_cmd("hash")
    .assert()
    .success()
    .stderr(predicate::str::contains("==> checksum"));
}

#[test]
#[serial]
fn hash_tracks_version_and_sources() {
  let env = TestEnv::new();
  let base = hash_of(&env, &[]);

  assert_eq!(hash_of(&env, &[]), base);
  assert_ne!(hash_of(&env, &["--version", "v1.0.0"]), base);

  env.write_file("src/internal/greet/greet.go", "package greet\n\nfunc Hello() { println() }\n");
  assert_ne!(hash_of(&env, &[]), base);
}

#[test]
#[serial]
fn hash_json_names_target() {
  let env = TestEnv::new();
  let output = env
    .target_cmd("hash")
    .args(["--version", "v2", "--output", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["target"], "example.com/demo/cmd/hello@v2");
  assert_eq!(value["hash"].as_str().map(str::len), Some(64));
}

#[test]
#[serial]
fn verbose_hash_lists_closure() {
  let env = TestEnv::new();
  env
    .target_cmd("hash")
    .arg("--verbose")
    .assert()
    .success()
    .stderr(predicate::str::contains("example.com/demo/internal/greet"));
}
