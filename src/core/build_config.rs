//! Build configuration - arguments shared by every external build and the
//! cache layout derived from them.
//!
//! ## Cache layout
//!
//! ```text
//! <cache>/
//! ├── <name>/<version>-<revision>/<target>/
//! │   ├── source/
//! │   ├── build/
//! │   └── install/
//! ├── <name>-<version>-<revision>-<target>.log
//! ├── <name>-<version>-<revision>-<target>.tar.gz
//! └── ext/                       # prebuilt dependency archives
//! ```
//!
//! Every defaulted path is a function of `(cache, name, version, revision,
//! target)` only, so repeated builds reuse the same directories and distinct
//! builds never share one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::core::errors::{BuildError, BuildResult};
use crate::core::target::Target;
use crate::util::config::Config;

/// Cache root inside the build container.
pub const DEFAULT_CACHE_DIR: &str = "/build/cache";

/// Command-line arguments common to every external build.
///
/// Path arguments are hidden: they are derived from the name, version,
/// revision and target, and only exist so they can be overridden.
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Name of the external project
    #[arg(long)]
    pub name: String,

    /// Version of the external project
    #[arg(long)]
    pub version: String,

    /// Build revision
    #[arg(long, default_value_t = 1)]
    pub revision: u32,

    /// Target to build
    #[arg(long, value_enum)]
    pub target: Target,

    /// Number of concurrent jobs to run (defaults to the number of CPUs)
    #[arg(long)]
    pub num_threads: Option<usize>,

    /// Print commands but do not execute
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file
    #[arg(long, env = "EXT_BUILDER_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "EXT_CACHE_DIR", default_value = DEFAULT_CACHE_DIR, hide = true)]
    pub cache_dir: PathBuf,

    #[arg(long, hide = true)]
    pub code_dir: Option<PathBuf>,

    #[arg(long, hide = true)]
    pub source_dir: Option<PathBuf>,

    #[arg(long, hide = true)]
    pub build_dir: Option<PathBuf>,

    #[arg(long, hide = true)]
    pub install_dir: Option<PathBuf>,

    #[arg(long, hide = true)]
    pub install_prefix: Option<PathBuf>,

    #[arg(long, hide = true)]
    pub log_file: Option<PathBuf>,

    #[arg(long = "pkg-file", hide = true)]
    pub pkg_file: Option<PathBuf>,
}

impl BuildArgs {
    /// Create arguments with every optional value unset.
    ///
    /// The target is given by name and must be one of the supported targets.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        revision: u32,
        target: &str,
    ) -> BuildResult<Self> {
        Ok(BuildArgs {
            name: name.into(),
            version: version.into(),
            revision,
            target: target.parse()?,
            num_threads: None,
            dry_run: false,
            verbose: false,
            config: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            code_dir: None,
            source_dir: None,
            build_dir: None,
            install_dir: None,
            install_prefix: None,
            log_file: None,
            pkg_file: None,
        })
    }

    /// Load the configuration file (if any) and fill in every default.
    pub fn resolve(&self) -> Result<BuildConfig> {
        let settings = Config::load_optional(self.config.as_deref())?;
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(self.resolve_with(settings, &cwd))
    }

    /// Fill in every default without touching the filesystem.
    pub fn resolve_with(&self, settings: Config, cwd: &Path) -> BuildConfig {
        let build_id = format!(
            "{}-{}-{}-{}",
            self.name, self.version, self.revision, self.target
        );
        let target_cache = self
            .cache_dir
            .join(&self.name)
            .join(format!("{}-{}", self.version, self.revision))
            .join(self.target.as_str());

        let or_default = |path: &Option<PathBuf>, default: PathBuf| {
            path.clone().unwrap_or(default)
        };

        BuildConfig {
            name: self.name.clone(),
            version: self.version.clone(),
            revision: self.revision,
            target: self.target,
            code_dir: or_default(&self.code_dir, cwd.to_path_buf()),
            source_dir: or_default(&self.source_dir, target_cache.join("source")),
            build_dir: or_default(&self.build_dir, target_cache.join("build")),
            install_dir: or_default(&self.install_dir, target_cache.join("install")),
            install_prefix: or_default(
                &self.install_prefix,
                self.target.install_prefix().to_path_buf(),
            ),
            log_file: or_default(&self.log_file, self.cache_dir.join(format!("{build_id}.log"))),
            pkg_file: or_default(
                &self.pkg_file,
                self.cache_dir.join(format!("{build_id}.tar.gz")),
            ),
            cache_dir: self.cache_dir.clone(),
            num_threads: self.num_threads.unwrap_or_else(host_cpu_count),
            dry_run: self.dry_run,
            verbose: self.verbose,
            settings,
        }
    }

    /// Resolve and create the cache directories.
    pub fn resolve_and_create(&self) -> Result<BuildConfig> {
        let config = self.resolve()?;
        config.make_dirs()?;
        Ok(config)
    }
}

fn host_cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Fully resolved configuration for one external build.
///
/// Constructed once per invocation and passed by reference to every operation.
#[derive(Debug, Clone, Serialize)]
pub struct BuildConfig {
    name: String,
    version: String,
    revision: u32,
    target: Target,
    cache_dir: PathBuf,
    code_dir: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_dir: PathBuf,
    install_prefix: PathBuf,
    log_file: PathBuf,
    pkg_file: PathBuf,
    num_threads: usize,
    dry_run: bool,
    verbose: bool,
    #[serde(skip)]
    settings: Config,
}

impl BuildConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Cache root shared by all builds.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory holding the project's build recipe and patches.
    pub fn code_dir(&self) -> &Path {
        &self.code_dir
    }

    /// Where source archives are downloaded and extracted.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Staging directory (`DESTDIR`) that gets packaged.
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Where prebuilt dependencies are extracted.
    pub fn install_prefix(&self) -> &Path {
        &self.install_prefix
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn pkg_file(&self) -> &Path {
        &self.pkg_file
    }

    /// Directory prebuilt dependency archives are cached in.
    pub fn ext_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("ext")
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn settings(&self) -> &Config {
        &self.settings
    }

    /// Whether the target differs from the machine we run on.
    pub fn is_cross(&self) -> bool {
        self.target != Target::host()
    }

    /// Create the source, build, install and install-prefix directories.
    ///
    /// Safe to call repeatedly. In dry-run mode nothing is created.
    pub fn make_dirs(&self) -> BuildResult<()> {
        for dir in [
            &self.source_dir,
            &self.build_dir,
            &self.install_dir,
            &self.install_prefix,
        ] {
            if self.dry_run {
                tracing::debug!("Would create {}", dir.display());
                continue;
            }
            std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
        }
        Ok(())
    }
}
