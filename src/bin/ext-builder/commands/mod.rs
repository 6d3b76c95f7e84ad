//! Command implementations

pub mod completions;
pub mod copy;
pub mod env;
pub mod fetch;
pub mod install_ext;
pub mod install_packages;
pub mod package;
pub mod paths;
pub mod replace;
pub mod run;

use anyhow::Result;

use ext_builder::util::logging;
use ext_builder::{BuildArgs, BuildConfig};

/// Resolve the configuration, start logging and create the cache directories.
pub fn setup(args: &BuildArgs) -> Result<BuildConfig> {
    let config = args.resolve()?;
    logging::init(&config)?;
    config.make_dirs()?;
    tracing::debug!(
        "Building {} {} (revision {}) for {}",
        config.name(),
        config.version(),
        config.revision(),
        config.target()
    );
    Ok(config)
}
