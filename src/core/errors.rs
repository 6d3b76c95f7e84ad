//! Error types for build operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised by the resolver or one of the command wrappers.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "invalid target `{0}`; expected one of linux-x86_64, linux-arm64-v8a, android-x86_64, android-arm64-v8a"
    )]
    InvalidTarget(String),

    #[error("command `{command}` returned with non-zero exit status {}", display_code(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid URL `{0}`")]
    InvalidUrl(String),

    #[error("invalid package spec `{0}`")]
    InvalidPackageSpec(String),

    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "(terminated by signal)".to_string(),
    }
}

impl BuildError {
    /// Exit code of the failed command, if this is a command failure.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildError::CommandFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
