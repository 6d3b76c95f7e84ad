//! `ext-builder env` command

use anyhow::Result;

use crate::cli::EnvArgs;
use ext_builder::toolchain_env;

pub fn execute(args: EnvArgs) -> Result<()> {
    let config = super::setup(&args.build)?;

    for (key, value) in toolchain_env(&config) {
        println!("{}={}", key, value);
    }

    Ok(())
}
