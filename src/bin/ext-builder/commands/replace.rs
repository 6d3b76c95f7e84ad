//! `ext-builder replace` command

use anyhow::Result;

use crate::cli::ReplaceArgs;
use ext_builder::ops::find_and_replace;

pub fn execute(args: ReplaceArgs) -> Result<()> {
    let config = super::setup(&args.build)?;
    find_and_replace(&config, &args.dir, &args.pattern, &args.search, &args.replace)?;
    Ok(())
}
