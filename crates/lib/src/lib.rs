//! scud-lib: content-addressed bundling of Go function assets.
//!
//! This crate provides the pieces a provisioning framework needs to treat a
//! Go entry point as a deployable asset:
//! - `hash`: a digest over the entry point's in-module dependency closure
//! - `compile`: cross-compilation into a single static executable
//! - `asset`: the hash + build capability, plus container build contexts
//! - `config`: the host variables consulted, captured once

pub mod asset;
pub mod compile;
pub mod config;
pub mod consts;
pub mod hash;
pub mod platform;
pub mod target;
pub mod toolchain;
