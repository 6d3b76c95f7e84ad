//! Core data structures: targets, the resolved build configuration and errors.

pub mod build_config;
pub mod errors;
pub mod target;

pub use build_config::{BuildArgs, BuildConfig};
pub use errors::{BuildError, BuildResult};
pub use target::Target;
