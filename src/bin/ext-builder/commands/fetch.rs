//! `ext-builder fetch` command

use anyhow::Result;

use crate::cli::FetchArgs;
use ext_builder::ops::fetch_source;

pub fn execute(args: FetchArgs) -> Result<()> {
    let config = super::setup(&args.build)?;

    fetch_source(&config, &args.url, args.extract)?;

    Ok(())
}
