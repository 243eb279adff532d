mod args;
mod build;
mod bundle;
mod container;
mod hash;
mod info;

pub use args::TargetArgs;
pub use build::cmd_build;
pub use bundle::cmd_bundle;
pub use container::{ContainerArgs, cmd_container};
pub use hash::cmd_hash;
pub use info::cmd_info;
