//! System package installation via apt.

use std::fmt;
use std::str::FromStr;

use crate::core::build_config::BuildConfig;
use crate::core::errors::{BuildError, BuildResult};
use crate::core::target::Target;
use crate::util::process::ProcessBuilder;

/// Marker for architecture-specific packages in the command-line spelling.
const ARCH_MARKER: &str = ":arch";

/// A system package to install.
///
/// Spelled `name[:arch][=version]` on the command line, where `:arch` marks a
/// package that must match the target's architecture (a multiarch package).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPackage {
    pub name: String,
    pub version: Option<String>,
    pub arch_specific: bool,
}

impl SystemPackage {
    /// A package by name, any version, host architecture.
    pub fn new(name: impl Into<String>) -> Self {
        SystemPackage {
            name: name.into(),
            version: None,
            arch_specific: false,
        }
    }

    /// Pin an exact version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Require the package for the target's architecture.
    pub fn arch_specific(mut self) -> Self {
        self.arch_specific = true;
        self
    }

    /// The argument passed to `apt-get install` for this target.
    pub fn install_arg(&self, target: Target) -> String {
        let mut arg = self.name.clone();
        if self.arch_specific {
            arg.push(':');
            arg.push_str(target.arch().debian_arch());
        }
        if let Some(ref version) = self.version {
            arg.push('=');
            arg.push_str(version);
        }
        arg
    }
}

impl From<&str> for SystemPackage {
    fn from(name: &str) -> Self {
        SystemPackage::new(name)
    }
}

impl From<(&str, &str, bool)> for SystemPackage {
    fn from((name, version, arch_specific): (&str, &str, bool)) -> Self {
        SystemPackage {
            name: name.to_string(),
            version: (!version.is_empty()).then(|| version.to_string()),
            arch_specific,
        }
    }
}

impl FromStr for SystemPackage {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, version) = match s.split_once('=') {
            Some((rest, version)) if !version.is_empty() => (rest, Some(version)),
            Some(_) => return Err(BuildError::InvalidPackageSpec(s.to_string())),
            None => (s, None),
        };
        let (name, arch_specific) = match rest.strip_suffix(ARCH_MARKER) {
            Some(name) => (name, true),
            None => (rest, false),
        };
        if name.is_empty() || name.contains(':') {
            return Err(BuildError::InvalidPackageSpec(s.to_string()));
        }

        Ok(SystemPackage {
            name: name.to_string(),
            version: version.map(str::to_string),
            arch_specific,
        })
    }
}

impl fmt::Display for SystemPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.arch_specific {
            f.write_str(ARCH_MARKER)?;
        }
        if let Some(ref version) = self.version {
            write!(f, "={version}")?;
        }
        Ok(())
    }
}

/// Install system packages with a single `apt-get install` after refreshing
/// the package index once.
pub fn install_packages(config: &BuildConfig, packages: &[SystemPackage]) -> BuildResult<()> {
    if packages.is_empty() {
        return Ok(());
    }

    let target = config.target();
    let install_args: Vec<String> = packages.iter().map(|p| p.install_arg(target)).collect();
    tracing::info!("Installing packages: {}", install_args.join(", "));

    ProcessBuilder::new("apt-get")
        .args(["update", "-y"])
        .exec_with(config)?;
    ProcessBuilder::new("apt-get")
        .args(["install", "-y"])
        .args(&install_args)
        .exec_with(config)
}
