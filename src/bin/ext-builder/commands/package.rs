//! `ext-builder package` command

use anyhow::Result;

use crate::cli::PackageArgs;
use ext_builder::ops::create_package;

pub fn execute(args: PackageArgs) -> Result<()> {
    let config = super::setup(&args.build)?;
    create_package(&config, args.subdir.as_deref())?;
    tracing::info!("Created {}", config.pkg_file().display());
    Ok(())
}
