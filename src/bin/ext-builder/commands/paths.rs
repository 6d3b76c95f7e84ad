//! `ext-builder paths` command

use anyhow::{Context, Result};

use crate::cli::PathsArgs;

pub fn execute(args: PathsArgs) -> Result<()> {
    let config = super::setup(&args.build)?;

    if args.json {
        let json = serde_json::to_string_pretty(&config)
            .context("failed to serialize build configuration")?;
        println!("{}", json);
        return Ok(());
    }

    println!("name:           {}", config.name());
    println!("version:        {}", config.version());
    println!("revision:       {}", config.revision());
    println!(
        "target:         {}{}",
        config.target(),
        if config.is_cross() { " (cross)" } else { "" }
    );
    println!("code dir:       {}", config.code_dir().display());
    println!("source dir:     {}", config.source_dir().display());
    println!("build dir:      {}", config.build_dir().display());
    println!("install dir:    {}", config.install_dir().display());
    println!("install prefix: {}", config.install_prefix().display());
    println!("log file:       {}", config.log_file().display());
    println!("package file:   {}", config.pkg_file().display());
    println!("threads:        {}", config.num_threads());

    Ok(())
}
