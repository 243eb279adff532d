//! CLI integration tests against a scripted Go toolchain.

#![cfg(unix)]

mod common;

mod build_tests;
mod hash_tests;
