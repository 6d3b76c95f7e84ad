//! `ext-builder copy` command

use anyhow::Result;

use crate::cli::CopyArgs;
use ext_builder::ops::copy;

pub fn execute(args: CopyArgs) -> Result<()> {
    let config = super::setup(&args.build)?;
    copy(&config, &args.src, &args.dest)?;
    Ok(())
}
