//! `ext-builder install-ext` command

use anyhow::Result;

use crate::cli::InstallExtArgs;
use ext_builder::ops::install_ext;

pub fn execute(args: InstallExtArgs) -> Result<()> {
    let config = super::setup(&args.build)?;
    install_ext(&config, &args.deps)?;
    Ok(())
}
