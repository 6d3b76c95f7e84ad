//! Subprocess execution.
//!
//! Every external tool ext-builder drives (`wget`, `tar`, `cp`, `apt-get`,
//! compilers) goes through [`ProcessBuilder::exec_with`], which honours
//! dry-run mode and streams the tool's output into the debug log.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::build_config::BuildConfig;
use crate::core::errors::{BuildError, BuildResult};

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_string_lossy().into_owned(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Build from a full command line, program first.
    ///
    /// Returns `None` for an empty command.
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut argv = argv.into_iter();
        let program = argv.next()?;
        Some(ProcessBuilder::new(program).args(argv))
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable on top of the inherited environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set several environment variables.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program name.
    pub fn get_program(&self) -> &str {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the extra environment.
    pub fn get_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(&self.env);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Run the command to completion, logging its output.
    ///
    /// In dry-run mode the command is only logged.
    pub fn exec_with(&self, config: &BuildConfig) -> BuildResult<()> {
        let command = self.display_command();
        tracing::debug!("Executing: {}", command);
        if config.is_dry_run() {
            return Ok(());
        }

        let mut child = self
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BuildError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        // The stderr reader logs through this thread's subscriber.
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        std::thread::scope(|s| {
            if let Some(stderr) = stderr {
                s.spawn(move || {
                    tracing::dispatcher::with_default(&dispatch, || log_lines(stderr))
                });
            }
            if let Some(stdout) = stdout {
                log_lines(stdout);
            }
        });

        let status = child.wait().map_err(|source| BuildError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !status.success() {
            return Err(BuildError::CommandFailed {
                command,
                exit_code: status.code(),
            });
        }
        Ok(())
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

// Reads to EOF so the child never sees a closed pipe. Output need not be UTF-8.
fn log_lines(stream: impl Read) {
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => tracing::debug!("{}", String::from_utf8_lossy(&line).trim_end()),
            Err(e) => {
                tracing::debug!("Failed to read command output: {}", e);
                let _ = io::copy(&mut reader, &mut io::sink());
                break;
            }
        }
    }
}

/// Execute a command line, optionally in `cwd` and with extra environment
/// variables layered over the current process environment.
pub fn execute<I, S>(
    config: &BuildConfig,
    cmd: I,
    cwd: Option<&Path>,
    env: Option<&BTreeMap<String, String>>,
) -> BuildResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let Some(mut process) = ProcessBuilder::from_argv(cmd) else {
        return Ok(());
    };
    if let Some(cwd) = cwd {
        process = process.cwd(cwd);
    }
    if let Some(env) = env {
        process = process.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    process.exec_with(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build_config::BuildArgs;
    use crate::test_support::capture_logs;
    use crate::util::config::Config;
    use tempfile::TempDir;

    fn config(tmp: &TempDir, dry_run: bool) -> BuildConfig {
        let mut args = BuildArgs::new("test", "1.0", 1, "linux-x86_64").unwrap();
        args.cache_dir = tmp.path().to_path_buf();
        args.dry_run = dry_run;
        args.resolve_with(Config::default(), tmp.path())
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("tar").args(["--create", "--gzip", "."]);

        assert_eq!(pb.display_command(), "tar --create --gzip .");
    }

    #[test]
    fn test_from_argv_empty() {
        assert!(ProcessBuilder::from_argv(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_execute_success() {
        let tmp = TempDir::new().unwrap();
        execute(&config(&tmp, false), ["true"], None, None).unwrap();
    }

    #[test]
    fn test_execute_failure_reports_exit_code() {
        let tmp = TempDir::new().unwrap();
        let err = execute(&config(&tmp, false), ["sh", "-c", "exit 3"], None, None).unwrap_err();

        match err {
            BuildError::CommandFailed { command, exit_code } => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(exit_code, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_execute_missing_program() {
        let tmp = TempDir::new().unwrap();
        let err = execute(
            &config(&tmp, false),
            ["ext-builder-no-such-program"],
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Spawn { .. }));
    }

    #[test]
    fn test_execute_uses_cwd_and_env() {
        let tmp = TempDir::new().unwrap();
        let mut env = BTreeMap::new();
        env.insert("EXT_BUILDER_TEST_VALUE".to_string(), "hello".to_string());

        execute(
            &config(&tmp, false),
            ["sh", "-c", "echo \"$EXT_BUILDER_TEST_VALUE\" > out.txt"],
            Some(tmp.path()),
            Some(&env),
        )
        .unwrap();

        let out = std::fs::read_to_string(tmp.path().join("out.txt")).unwrap();
        assert_eq!(out.trim(), "hello");
        assert!(std::env::var("EXT_BUILDER_TEST_VALUE").is_err());
    }

    #[test]
    fn test_dry_run_does_not_execute() {
        let tmp = TempDir::new().unwrap();
        let marker = tmp.path().join("marker");

        execute(
            &config(&tmp, true),
            [OsStr::new("touch"), marker.as_os_str()],
            None,
            None,
        )
        .unwrap();

        assert!(!marker.exists());
    }

    #[test]
    fn test_output_streams_logged() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, false);

        let (result, logs) = capture_logs(|| {
            execute(
                &config,
                ["sh", "-c", "echo from-stdout; echo from-stderr >&2"],
                None,
                None,
            )
        });
        result.unwrap();

        assert!(logs.contains("from-stdout"));
        assert!(logs.contains("from-stderr"));
    }

    #[test]
    fn test_non_utf8_output_does_not_fail_command() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp, false);
        // Enough output after the invalid byte to overflow the pipe buffer.
        let script = "printf 'caf\\351\\n'; i=0; \
            while [ $i -lt 4000 ]; do \
            echo 'xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx'; i=$((i+1)); \
            done; echo last-line; exit 0";

        let (result, logs) = capture_logs(|| execute(&config, ["sh", "-c", script], None, None));
        result.unwrap();

        assert!(logs.contains("caf\u{FFFD}"));
        assert!(logs.contains("last-line"));
    }
}
