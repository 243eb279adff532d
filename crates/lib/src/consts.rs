//! Constants shared across the crate.

/// File name of the compiled executable inside an asset directory.
pub const BINARY_NAME: &str = "bootstrap";

/// Runtime identifier for custom-runtime functions.
pub const FUNCTION_RUNTIME: &str = "provided.al2";

/// Build tags passed to the toolchain unless the caller replaces them.
pub const DEFAULT_BUILD_TAGS: &[&str] = &["lambda.norpc"];

/// Link-time variable that receives the build target's version tag.
pub const VERSION_SYMBOL: &str = "main.version";

/// Number of digest characters shown in progress output.
pub const DIGEST_PREFIX_LEN: usize = 8;

/// File name suffixes folded into the content digest.
pub const HASHED_EXTENSIONS: &[&str] = &["go", "mod", "sum"];

/// Dependency manifests at the module root, hashed for every target.
pub const DESCRIPTOR_EXTENSIONS: &[&str] = &["mod", "sum"];

/// Name of the generated image-build descriptor.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Host variables.
pub mod env {
  pub const WORKSPACE: &str = "GITHUB_WORKSPACE";
  pub const CI_ACTION: &str = "GITHUB_ACTION";
  pub const COMPRESS: &str = "SCUD_COMPRESS_UPX";
  pub const HOME: &str = "HOME";
  pub const PATH: &str = "PATH";
  pub const GOPATH: &str = "GOPATH";
  pub const GOROOT: &str = "GOROOT";
  pub const GOMODCACHE: &str = "GOMODCACHE";
  pub const GOCACHE: &str = "GOCACHE";
  pub const GOOS: &str = "GOOS";
  pub const GOARCH: &str = "GOARCH";
  pub const CGO_ENABLED: &str = "CGO_ENABLED";
}
