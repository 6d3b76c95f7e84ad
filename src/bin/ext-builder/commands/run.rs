//! `ext-builder run` command
//!
//! Runs a build tool (configure, make, cmake, ...) with the target's compiler
//! environment. `MAKEFLAGS` carries `--num-threads` unless already set.

use anyhow::Result;

use crate::cli::RunArgs;
use ext_builder::builder::toolchain::jobs_flag;
use ext_builder::{execute as execute_command, toolchain_env};

pub fn execute(args: RunArgs) -> Result<()> {
    let config = super::setup(&args.build)?;

    let mut env = toolchain_env(&config);
    if std::env::var_os("MAKEFLAGS").is_none() {
        env.insert("MAKEFLAGS".to_string(), jobs_flag(&config));
    }

    let cwd = args.cwd.as_deref().unwrap_or(config.build_dir());
    execute_command(&config, &args.command, Some(cwd), Some(&env))?;

    Ok(())
}
