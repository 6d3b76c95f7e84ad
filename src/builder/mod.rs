//! Compiler environment for building external projects.

pub mod toolchain;

pub use toolchain::{toolchain_env, toolchain_env_with, EnvSource, ProcessEnv};
