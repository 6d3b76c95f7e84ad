//! ext-builder - helpers for building external dependencies
//!
//! This crate provides what an external project's build recipe needs:
//! argument parsing and cache layout ([`BuildArgs`], [`BuildConfig`]), a
//! per-target compiler environment, fetching sources and prebuilt
//! dependencies, and packaging the install directory.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

#[cfg(test)]
pub mod test_support;

pub use core::{BuildArgs, BuildConfig, BuildError, BuildResult, Target};
pub use builder::toolchain::toolchain_env;
pub use util::process::execute;
