//! `ext-builder install-packages` command

use anyhow::Result;

use crate::cli::InstallPackagesArgs;
use ext_builder::ops::install_packages;

pub fn execute(args: InstallPackagesArgs) -> Result<()> {
    let config = super::setup(&args.build)?;
    install_packages(&config, &args.packages)?;
    Ok(())
}
