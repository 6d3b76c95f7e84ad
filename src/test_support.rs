//! Test utilities shared by unit tests.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::subscriber::with_default;

use crate::core::build_config::{BuildArgs, BuildConfig};
use crate::util::config::Config;

/// Log writer that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Everything logged so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a DEBUG-level subscriber capturing its log output on this thread.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    let result = with_default(subscriber, f);
    (result, logs.contents())
}

/// Resolve a config whose cache and install prefix live under `root`.
pub fn test_config(root: &Path, target: &str, dry_run: bool) -> BuildConfig {
    let mut args = BuildArgs::new("zlib", "1.3.1", 1, target).unwrap();
    args.cache_dir = root.join("cache");
    args.install_prefix = Some(root.join("prefix"));
    args.dry_run = dry_run;
    args.resolve_with(Config::default(), root)
}
