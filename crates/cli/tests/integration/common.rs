//! Shared test helpers for CLI integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const MODULE: &str = "example.com/demo";

/// `list` prints `deps.txt`; `build` writes a fake executable to the `-o`
/// path, or fails when the `fail` marker exists.
const FAKE_GO: &str = r#"#!/bin/sh
state='@STATE@'
case "$1" in
  list)
    cat "$state/deps.txt"
    ;;
  build)
    env > "$state/build.env"
    if [ -f "$state/fail" ]; then
      echo "./main.go:3:1: syntax error" >&2
      exit 1
    fi
    out=""
    while [ $# -gt 0 ]; do
      [ "$1" = "-o" ] && out="$2"
      shift
    done
    printf 'fake-elf' > "$out"
    chmod +x "$out"
    ;;
esac
"#;

/// Isolated test environment: a module tree, a scripted toolchain and an
/// output directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };

    fs::create_dir_all(env.state_dir()).unwrap();
    let script = FAKE_GO.replace("@STATE@", env.state_dir().to_str().unwrap());
    fs::write(env.toolchain(), script).unwrap();
    fs::set_permissions(env.toolchain(), fs::Permissions::from_mode(0o755)).unwrap();

    env.write_file("src/go.mod", &format!("module {}\n", MODULE));
    env.write_file(
      "src/cmd/hello/main.go",
      &format!("package main\n\nimport \"{}/internal/greet\"\n\nfunc main() {{ greet.Hello() }}\n", MODULE),
    );
    env.write_file("src/internal/greet/greet.go", "package greet\n\nfunc Hello() {}\n");
    env.set_deps(&["fmt", "example.com/demo/internal/greet"]);
    env
  }

  fn state_dir(&self) -> PathBuf {
    self.temp.path().join("state")
  }

  pub fn toolchain(&self) -> PathBuf {
    self.temp.path().join("go")
  }

  pub fn source_root(&self) -> PathBuf {
    self.temp.path().join("src")
  }

  pub fn out_dir(&self) -> PathBuf {
    self.temp.path().join("out")
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  pub fn set_deps(&self, deps: &[&str]) {
    fs::write(self.state_dir().join("deps.txt"), deps.join("\n")).unwrap();
  }

  pub fn fail_builds(&self) {
    fs::write(self.state_dir().join("fail"), "").unwrap();
  }

  pub fn build_env(&self) -> String {
    fs::read_to_string(self.state_dir().join("build.env")).unwrap()
  }

  /// Get a pre-configured Command for the scud binary.
  ///
  /// CI signals are cleared so results do not depend on where tests run.
  pub fn scud_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("scud");
    cmd.env_remove("GITHUB_WORKSPACE");
    cmd.env_remove("GITHUB_ACTION");
    cmd.env_remove("SCUD_COMPRESS_UPX");
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// `scud <command> example.com/demo cmd/hello` wired to this environment.
  pub fn target_cmd(&self, command: &str) -> Command {
    let mut cmd = self.scud_cmd();
    cmd
      .arg(command)
      .args([MODULE, "cmd/hello"])
      .arg("--source-root")
      .arg(self.source_root())
      .arg("--toolchain")
      .arg(self.toolchain());
    cmd
  }
}
