//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use ext_builder::ops::{ArchiveKind, ExtDependency, SystemPackage};
use ext_builder::BuildArgs;

/// Build steps for external dependencies, for Linux and Android targets
#[derive(Parser)]
#[command(name = "ext-builder")]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved build configuration
    Paths(PathsArgs),

    /// Print the compiler environment for the target
    Env(EnvArgs),

    /// Fetch (and optionally extract) a source archive
    Fetch(FetchArgs),

    /// Install prebuilt external dependencies into the install prefix
    InstallExt(InstallExtArgs),

    /// Install system packages with apt
    InstallPackages(InstallPackagesArgs),

    /// Copy a file or directory
    Copy(CopyArgs),

    /// Replace text in place in files under a directory
    Replace(ReplaceArgs),

    /// Run a command with the target's compiler environment
    Run(RunArgs),

    /// Package the install directory into a tarball
    Package(PackageArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct PathsArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct EnvArgs {
    #[command(flatten)]
    pub build: BuildArgs,
}

#[derive(Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// URL of the source archive
    pub url: String,

    /// Extract the archive into the source directory
    #[arg(long, value_enum)]
    pub extract: Option<ArchiveKind>,
}

#[derive(Args)]
pub struct InstallExtArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Dependencies as `name=version`, installed in the order given
    #[arg(required = true)]
    pub deps: Vec<ExtDependency>,
}

#[derive(Args)]
pub struct InstallPackagesArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Packages as `name[:arch][=version]`; `:arch` selects the target's architecture
    #[arg(required = true)]
    pub packages: Vec<SystemPackage>,
}

#[derive(Args)]
pub struct CopyArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// File or directory to copy
    pub src: PathBuf,

    /// Destination
    pub dest: PathBuf,
}

#[derive(Args)]
pub struct ReplaceArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Directory to search
    pub dir: PathBuf,

    /// File name pattern, e.g. `*.pc`
    pub pattern: String,

    /// Text to search for (sed regular expression)
    pub search: String,

    /// Replacement text
    pub replace: String,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Working directory (defaults to the build directory)
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Command to run
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Package only this subdirectory of the install directory
    #[arg(long)]
    pub subdir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
