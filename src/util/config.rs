//! Configuration file support.
//!
//! ext-builder reads an optional TOML file (`--config` or
//! `EXT_BUILDER_CONFIG`). Every setting has a default, so a missing file and
//! an empty file behave the same.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default host serving prebuilt dependency releases.
pub const DEFAULT_RELEASE_HOST: &str = "github.com";

/// Default organization owning the `ext-<name>` release repositories.
pub const DEFAULT_RELEASE_ORG: &str = "tst-race";

/// Android API level compilers are invoked for.
pub const DEFAULT_ANDROID_API_LEVEL: u32 = 29;

/// NDK location used when `ANDROID_NDK` is not set.
pub const DEFAULT_ANDROID_NDK: &str = "/opt/android/ndk/default";

/// ext-builder configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where prebuilt dependencies are downloaded from
    pub release: ReleaseConfig,

    /// Android cross-compilation settings
    pub android: AndroidConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    pub host: String,
    pub org: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            host: DEFAULT_RELEASE_HOST.to_string(),
            org: DEFAULT_RELEASE_ORG.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// API level baked into the clang wrapper names
    pub api_level: u32,

    /// NDK root, consulted when `ANDROID_NDK` is unset
    pub ndk_dir: PathBuf,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        AndroidConfig {
            api_level: DEFAULT_ANDROID_API_LEVEL,
            ndk_dir: PathBuf::from(DEFAULT_ANDROID_NDK),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration if a path was given and exists, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                tracing::debug!("config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Release URL of a prebuilt dependency archive for the given target.
    pub fn release_url(&self, name: &str, version: &str, target: &str) -> String {
        format!(
            "https://{}/{}/ext-{name}/releases/download/{version}/{name}-{version}-{target}.tar.gz",
            self.release.host, self.release.org
        )
    }
}
