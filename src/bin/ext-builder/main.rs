//! ext-builder CLI - build steps for external dependencies

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Paths(args) => commands::paths::execute(args),
        Commands::Env(args) => commands::env::execute(args),
        Commands::Fetch(args) => commands::fetch::execute(args),
        Commands::InstallExt(args) => commands::install_ext::execute(args),
        Commands::InstallPackages(args) => commands::install_packages::execute(args),
        Commands::Copy(args) => commands::copy::execute(args),
        Commands::Replace(args) => commands::replace::execute(args),
        Commands::Run(args) => commands::run::execute(args),
        Commands::Package(args) => commands::package::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
