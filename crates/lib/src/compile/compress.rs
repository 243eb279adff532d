//! Optional executable compression.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::{debug, info};

use super::types::BuildError;

const UPX_ARGS: &[&str] = &["--best", "-q", "--lzma"];

/// Shrinks a produced executable in place with `upx`.
#[derive(Debug, Clone)]
pub struct Compressor {
  program: PathBuf,
}

impl Default for Compressor {
  fn default() -> Self {
    Self {
      program: PathBuf::from("upx"),
    }
  }
}

impl Compressor {
  pub fn with_program(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
    }
  }

  pub fn compress(&self, artifact: &Path) -> Result<(), BuildError> {
    let started = Instant::now();
    let post_process_error = |reason: String| BuildError::PostProcess {
      path: artifact.to_path_buf(),
      reason,
    };

    debug!(program = ?self.program, artifact = ?artifact, "compressing artifact");

    let status = Command::new(&self.program)
      .args(UPX_ARGS)
      .arg(artifact)
      .stdout(Stdio::null())
      .stderr(Stdio::inherit())
      .status()
      .map_err(|e| post_process_error(format!("failed to start {}: {}", self.program.display(), e)))?;

    if !status.success() {
      return Err(post_process_error(format!("exit code {:?}", status.code())));
    }

    info!(artifact = ?artifact, elapsed = ?started.elapsed(), "==> compress");
    Ok(())
  }
}
