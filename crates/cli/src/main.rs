mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::TargetArgs;
use output::{OutputFormat, print_error};

/// scud - content-addressed bundling of Go function assets
#[derive(Parser)]
#[command(name = "scud")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the content hash of a build target
  Hash {
    #[command(flatten)]
    target: TargetArgs,
  },

  /// Compile a build target into a single executable
  Build {
    #[command(flatten)]
    target: TargetArgs,

    /// Output directory (default: a per-target directory under the system temp dir)
    #[arg(long)]
    out_dir: Option<PathBuf>,
  },

  /// Hash and build a target, then describe the resulting function
  Bundle {
    #[command(flatten)]
    target: TargetArgs,

    /// Output directory (default: a per-target directory under the system temp dir)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Stack name used to prefix the function name
    #[arg(long)]
    stack: Option<String>,
  },

  /// Stage a container image build context for a target
  Container {
    #[command(flatten)]
    target: TargetArgs,

    /// Output directory (default: a per-target directory under the system temp dir)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Base image
    #[arg(long, default_value = "scratch")]
    base_image: String,

    /// Package installed into the image (repeatable)
    #[arg(long = "package")]
    packages: Vec<String>,

    /// Static asset copied to /opt, relative to the source root (repeatable)
    #[arg(long = "asset")]
    assets: Vec<String>,
  },

  /// Display host and default target information
  Info,
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if let Err(e) = run(cli) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let verbose = cli.verbose;
  let output = cli.output;

  match cli.command {
    Commands::Hash { target } => cmd::cmd_hash(&target, verbose, output),
    Commands::Build { target, out_dir } => cmd::cmd_build(&target, out_dir, verbose, output),
    Commands::Bundle { target, out_dir, stack } => cmd::cmd_bundle(&target, out_dir, stack.as_deref(), verbose, output),
    Commands::Container {
      target,
      out_dir,
      base_image,
      packages,
      assets,
    } => {
      let spec = cmd::ContainerArgs {
        base_image,
        packages,
        assets,
      };
      cmd::cmd_container(&target, out_dir, spec, verbose, output)
    }
    Commands::Info => cmd::cmd_info(output),
  }
}

/// `RUST_LOG` wins; otherwise progress lines at info, or everything at
/// debug with `--verbose`.
fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("debug")
    } else {
      EnvFilter::new("info")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();
}
