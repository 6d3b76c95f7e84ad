//! High-level operations used by external build recipes.
//!
//! Each operation is a thin wrapper around one or two external tools, run
//! through [`crate::util::process`].

pub mod fetch;
pub mod files;
pub mod packages;

pub use fetch::{fetch_source, install_ext, ArchiveKind, ExtDependency};
pub use files::{copy, create_package, find_and_replace};
pub use packages::{install_packages, SystemPackage};
