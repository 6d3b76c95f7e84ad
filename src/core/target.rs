//! Target platforms - what an external dependency gets built for.
//!
//! Every build is for exactly one of four targets. The target decides the
//! compiler environment, the install prefix and the architecture suffix used
//! for system packages.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::BuildError;

/// Operating system family of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Android,
}

/// CPU architecture of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Arm64,
}

impl Arch {
    /// Architecture component of a GNU/LLVM target triple.
    pub fn triple_arch(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "aarch64",
        }
    }

    /// Debian architecture name, used for multiarch package qualifiers.
    pub fn debian_arch(&self) -> &'static str {
        match self {
            Arch::X86_64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// A build target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Target {
    #[serde(rename = "linux-x86_64")]
    #[value(name = "linux-x86_64")]
    LinuxX86_64,

    #[serde(rename = "linux-arm64-v8a")]
    #[value(name = "linux-arm64-v8a")]
    LinuxArm64V8a,

    #[serde(rename = "android-x86_64")]
    #[value(name = "android-x86_64")]
    AndroidX86_64,

    #[serde(rename = "android-arm64-v8a")]
    #[value(name = "android-arm64-v8a")]
    AndroidArm64V8a,
}

impl Target {
    /// All supported targets.
    pub const ALL: [Target; 4] = [
        Target::LinuxX86_64,
        Target::LinuxArm64V8a,
        Target::AndroidX86_64,
        Target::AndroidArm64V8a,
    ];

    /// Canonical name, as used on the command line and in cache paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::LinuxX86_64 => "linux-x86_64",
            Target::LinuxArm64V8a => "linux-arm64-v8a",
            Target::AndroidX86_64 => "android-x86_64",
            Target::AndroidArm64V8a => "android-arm64-v8a",
        }
    }

    pub fn os(&self) -> Os {
        match self {
            Target::LinuxX86_64 | Target::LinuxArm64V8a => Os::Linux,
            Target::AndroidX86_64 | Target::AndroidArm64V8a => Os::Android,
        }
    }

    pub fn arch(&self) -> Arch {
        match self {
            Target::LinuxX86_64 | Target::AndroidX86_64 => Arch::X86_64,
            Target::LinuxArm64V8a | Target::AndroidArm64V8a => Arch::Arm64,
        }
    }

    pub fn is_android(&self) -> bool {
        self.os() == Os::Android
    }

    /// Filesystem root that dependencies for this target get installed under.
    ///
    /// Both Linux targets share the system prefix; each Android ABI has its own.
    pub fn install_prefix(&self) -> &'static Path {
        match self {
            Target::LinuxX86_64 | Target::LinuxArm64V8a => Path::new("/usr/local"),
            Target::AndroidX86_64 => Path::new("/android/x86_64"),
            Target::AndroidArm64V8a => Path::new("/android/arm64-v8a"),
        }
    }

    /// The Linux target matching the architecture this process runs on.
    pub fn host() -> Target {
        if cfg!(target_arch = "aarch64") {
            Target::LinuxArm64V8a
        } else {
            Target::LinuxX86_64
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BuildError::InvalidTarget(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_canonical_names() {
        for target in Target::ALL {
            assert_eq!(target.as_str().parse::<Target>().unwrap(), target);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "windows-x86_64".parse::<Target>().unwrap_err();
        assert!(matches!(err, BuildError::InvalidTarget(ref s) if s == "windows-x86_64"));
    }

    #[test]
    fn test_install_prefix_shared_on_linux() {
        assert_eq!(
            Target::LinuxX86_64.install_prefix(),
            Target::LinuxArm64V8a.install_prefix()
        );
        assert_ne!(
            Target::AndroidX86_64.install_prefix(),
            Target::AndroidArm64V8a.install_prefix()
        );
        assert_ne!(
            Target::LinuxX86_64.install_prefix(),
            Target::AndroidX86_64.install_prefix()
        );
    }

    #[test]
    fn test_arch_names() {
        assert_eq!(Target::AndroidArm64V8a.arch().debian_arch(), "arm64");
        assert_eq!(Target::LinuxX86_64.arch().debian_arch(), "amd64");
        assert_eq!(Target::LinuxArm64V8a.arch().triple_arch(), "aarch64");
    }
}
