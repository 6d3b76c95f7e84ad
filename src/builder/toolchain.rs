//! Compiler environment for a target.
//!
//! Build systems of external projects (autotools, CMake, plain Makefiles)
//! pick their compilers up from `CC`, `CXX` and friends. This module computes
//! those variables for the configured target. The result is handed to the
//! process layer per command; the ambient environment is never modified.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::build_config::BuildConfig;
use crate::core::target::Os;

/// Host tag of the prebuilt LLVM toolchain shipped in the NDK.
const NDK_HOST_TAG: &str = "linux-x86_64";

/// Binutils-style tools set for Android builds.
const ANDROID_TOOLS: [(&str, &str); 6] = [
    ("AR", "ar"),
    ("AS", "as"),
    ("LD", "ld"),
    ("RANLIB", "ranlib"),
    ("READELF", "readelf"),
    ("STRIP", "strip"),
];

/// Read access to the outside world, so tests can substitute their own.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
    fn is_dir(&self, path: &Path) -> bool;
}

/// The real process environment and filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Toolchain environment variables for the configured target.
pub fn toolchain_env(config: &BuildConfig) -> BTreeMap<String, String> {
    toolchain_env_with(config, &ProcessEnv)
}

/// Like [`toolchain_env`], reading `PATH`/`ANDROID_NDK` from `source`.
pub fn toolchain_env_with(config: &BuildConfig, source: &dyn EnvSource) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(
        "DESTDIR".to_string(),
        config.install_dir().display().to_string(),
    );

    let target = config.target();
    let arch = target.arch().triple_arch();
    match target.os() {
        Os::Linux => {
            env.insert("CC".to_string(), format!("clang -target {arch}-linux-gnu"));
            env.insert("CXX".to_string(), format!("clang++ -target {arch}-linux-gnu"));
        }
        Os::Android => {
            let api = config.settings().android.api_level;
            for (var, tool) in ANDROID_TOOLS {
                env.insert(var.to_string(), format!("{arch}-linux-android-{tool}"));
            }
            env.insert("CC".to_string(), format!("{arch}-linux-android{api}-clang"));
            env.insert("CXX".to_string(), format!("{arch}-linux-android{api}-clang++"));

            let ndk_bin = ndk_bin_dir(config, source);
            if source.is_dir(&ndk_bin) {
                let path = match source.var("PATH") {
                    Some(path) if !path.is_empty() => format!("{}:{path}", ndk_bin.display()),
                    _ => ndk_bin.display().to_string(),
                };
                env.insert("PATH".to_string(), path);
            } else {
                tracing::debug!("NDK toolchain not found at {}", ndk_bin.display());
            }
        }
    }

    env
}

/// Directory holding the NDK's clang wrappers and binutils.
pub fn ndk_bin_dir(config: &BuildConfig, source: &dyn EnvSource) -> PathBuf {
    let root = source
        .var("ANDROID_NDK")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| config.settings().android.ndk_dir.clone());
    root.join("toolchains")
        .join("llvm")
        .join("prebuilt")
        .join(NDK_HOST_TAG)
        .join("bin")
}

/// `-j` value for a build tool, from `--num-threads`.
pub fn jobs_flag(config: &BuildConfig) -> String {
    format!("-j{}", config.num_threads())
}
