//! Logger setup.
//!
//! Everything goes to the build's log file at DEBUG level, so the full output
//! of every external tool is kept next to the package. The console shows INFO
//! unless `--verbose` or `--dry-run` is set; `RUST_LOG` overrides it.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::build_config::BuildConfig;

/// Console filter for the given flags, unless `RUST_LOG` is set.
pub fn console_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ext_builder=debug")
        } else {
            EnvFilter::new("ext_builder=info")
        }
    })
}

/// Install the global subscriber writing to the console and `config.log_file()`.
///
/// The log file is truncated.
pub fn init(config: &BuildConfig) -> Result<()> {
    let log_file = config.log_file();
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(log_file)
        .with_context(|| format!("failed to create log file: {}", log_file.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(io::stdout().is_terminal())
        .with_target(false)
        .without_time()
        .with_filter(console_filter(config.is_verbose() || config.is_dry_run()));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("failed to install logger")?;

    Ok(())
}
