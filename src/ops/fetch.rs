//! Fetching source archives and prebuilt dependencies.
//!
//! Downloads are cached by file presence only: if the target file exists it
//! is used as-is. There is no checksum verification, and a partially
//! downloaded file is not detected.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::core::build_config::BuildConfig;
use crate::core::errors::{BuildError, BuildResult};
use crate::util::process::ProcessBuilder;

/// Archive formats `fetch_source` knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArchiveKind {
    #[value(name = "tar.gz")]
    TarGz,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveKind::TarGz => f.write_str("tar.gz"),
        }
    }
}

/// A prebuilt dependency, `name=version` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtDependency {
    pub name: String,
    pub version: String,
}

impl ExtDependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        ExtDependency {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Archive file name for the given target.
    pub fn file_name(&self, target: &str) -> String {
        format!("{}-{}-{}.tar.gz", self.name, self.version, target)
    }
}

impl FromStr for ExtDependency {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(ExtDependency::new(name, version))
            }
            _ => Err(BuildError::InvalidPackageSpec(s.to_string())),
        }
    }
}

/// File name a URL would be saved under.
pub fn url_file_name(url: &str) -> BuildResult<String> {
    let parsed = Url::parse(url).map_err(|_| BuildError::InvalidUrl(url.to_string()))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BuildError::InvalidUrl(url.to_string()))
}

/// Download `url` to `dest` with wget unless `dest` already exists.
///
/// Returns whether a download was performed.
fn download(config: &BuildConfig, url: &str, dest: &Path) -> BuildResult<bool> {
    if dest.exists() {
        tracing::debug!("Using cached {}", dest.display());
        return Ok(false);
    }

    tracing::info!("Fetching {} to {}", url, dest.display());
    ProcessBuilder::new("wget")
        .arg(format!("--output-document={}", dest.display()))
        .arg("--no-verbose")
        .arg(url)
        .exec_with(config)?;
    Ok(true)
}

fn extract_tar(config: &BuildConfig, archive: &Path, dest: &Path) -> BuildResult<()> {
    ProcessBuilder::new("tar")
        .arg("--extract")
        .arg(format!("--file={}", archive.display()))
        .arg(format!("--directory={}", dest.display()))
        .exec_with(config)
}

/// Fetch a source archive into the source directory, optionally extracting it.
///
/// Returns the path of the downloaded file.
pub fn fetch_source(
    config: &BuildConfig,
    url: &str,
    extract: Option<ArchiveKind>,
) -> BuildResult<PathBuf> {
    let local_path = config.source_dir().join(url_file_name(url)?);
    download(config, url, &local_path)?;

    if let Some(ArchiveKind::TarGz) = extract {
        tracing::info!("Extracting {}", url);
        extract_tar(config, &local_path, config.source_dir())?;
    }

    Ok(local_path)
}

/// Download prebuilt dependencies and extract them into the install prefix.
///
/// Dependencies are installed in the order given.
pub fn install_ext(config: &BuildConfig, deps: &[ExtDependency]) -> BuildResult<()> {
    let cache_dir = config.ext_cache_dir();
    if !config.is_dry_run() && !deps.is_empty() {
        std::fs::create_dir_all(&cache_dir).map_err(|e| BuildError::io(&cache_dir, e))?;
    }

    let target = config.target();
    for dep in deps {
        let url = config
            .settings()
            .release_url(&dep.name, &dep.version, target.as_str());
        let archive = cache_dir.join(dep.file_name(target.as_str()));
        download(config, &url, &archive)?;

        tracing::info!(
            "Installing {}-{} into {}",
            dep.name,
            dep.version,
            config.install_prefix().display()
        );
        extract_tar(config, &archive, config.install_prefix())?;
    }
    Ok(())
}
