//! Shared utilities

pub mod config;
pub mod logging;
pub mod process;

pub use config::Config;
pub use process::{execute, ProcessBuilder};
