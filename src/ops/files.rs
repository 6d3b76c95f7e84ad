//! File operations on the build tree: copying, in-place substitution and
//! packaging the install directory.

use std::path::Path;

use crate::core::build_config::BuildConfig;
use crate::core::errors::{BuildError, BuildResult};
use crate::util::process::ProcessBuilder;

/// Copy a file or directory to `dest`.
///
/// Directories are copied recursively with permissions preserved.
pub fn copy(config: &BuildConfig, src: &Path, dest: &Path) -> BuildResult<()> {
    tracing::info!("Copying {} to {}", src.display(), dest.display());

    let mut cmd = ProcessBuilder::new("cp");
    if src.is_dir() {
        cmd = cmd.args(["--recursive", "--preserve"]);
    }
    cmd.arg(src).arg(dest).exec_with(config)
}

// Only unescaped delimiters are escaped in the pattern; backslashes there are regex syntax.
fn escape_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;
    for c in s.chars() {
        if c == '/' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

fn escape_replacement(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '/' | '\\' | '&') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Replace every match of `search` with `replace`, in place, in all files
/// under `dir` whose name matches `file_pattern`.
///
/// `search` is a sed basic regular expression.
pub fn find_and_replace(
    config: &BuildConfig,
    dir: &Path,
    file_pattern: &str,
    search: &str,
    replace: &str,
) -> BuildResult<()> {
    tracing::info!(
        "Replacing `{}` with `{}` in {} files under {}",
        search,
        replace,
        file_pattern,
        dir.display()
    );

    let expr = format!("s/{}/{}/g", escape_pattern(search), escape_replacement(replace));
    ProcessBuilder::new("find")
        .arg(dir)
        .args(["-type", "f", "-name", file_pattern, "-exec", "sed", "-i"])
        .arg(expr)
        .args(["{}", "+"])
        .exec_with(config)
}

/// Package the install directory (or `subdir` of it) into the package file.
///
/// Archive members are stored relative to the packaged directory, under `.`.
pub fn create_package(config: &BuildConfig, subdir: Option<&Path>) -> BuildResult<()> {
    let root = match subdir {
        Some(subdir) => config.install_dir().join(subdir),
        None => config.install_dir().to_path_buf(),
    };
    tracing::info!(
        "Packaging {} into {}",
        root.display(),
        config.pkg_file().display()
    );
    if let Some(parent) = config.pkg_file().parent() {
        if !config.is_dry_run() {
            std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
    }

    ProcessBuilder::new("tar")
        .arg("--create")
        .arg(format!("--file={}", config.pkg_file().display()))
        .arg("--gzip")
        .arg(format!("--directory={}", root.display()))
        .arg(".")
        .exec_with(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_logs, test_config};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sed_escaping() {
        assert_eq!(escape_pattern("/usr/local"), "\\/usr\\/local");
        assert_eq!(escape_pattern("lib/.*\\.a"), "lib\\/.*\\.a");
        assert_eq!(escape_replacement("/opt/a&b"), "\\/opt\\/a\\&b");
    }

    #[test]
    fn test_sed_escaping_keeps_escaped_delimiter() {
        assert_eq!(escape_pattern("\\/usr\\/local"), "\\/usr\\/local");
        assert_eq!(escape_pattern("a\\\\/b"), "a\\\\\\/b");
    }

    #[test]
    fn test_find_and_replace_escaped_delimiter() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "linux-x86_64", false);
        let dir = tmp.path().join("tree");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.pc"), "prefix=/usr/local\n").unwrap();

        find_and_replace(&config, &dir, "*.pc", "\\/usr\\/local", "/opt").unwrap();

        assert_eq!(fs::read_to_string(dir.join("a.pc")).unwrap(), "prefix=/opt\n");
    }

    #[test]
    fn test_find_and_replace_dry_run() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "linux-x86_64", true);
        let dir = tmp.path().join("tree");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.pc"), "prefix=/usr/local\n").unwrap();

        let (result, logs) =
            capture_logs(|| find_and_replace(&config, &dir, "*.pc", "/usr/local", "/opt"));
        result.unwrap();

        assert!(logs.contains(&format!(
            "Executing: find {} -type f -name *.pc -exec sed -i s/\\/usr\\/local/\\/opt/g {{}} +",
            dir.display()
        )));
        assert_eq!(
            fs::read_to_string(dir.join("a.pc")).unwrap(),
            "prefix=/usr/local\n"
        );
    }

    #[test]
    fn test_copy_directory_preserves_tree() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "linux-x86_64", false);
        let src = tmp.path().join("patches");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("nested/fix.patch"), "diff").unwrap();

        let dest = tmp.path().join("copied");
        copy(&config, &src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("nested/fix.patch")).unwrap(), "diff");
    }

    #[test]
    fn test_copy_file_flags() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "linux-x86_64", true);
        let src = tmp.path().join("file.txt");
        fs::write(&src, "x").unwrap();

        let (result, logs) = capture_logs(|| copy(&config, &src, &tmp.path().join("out.txt")));
        result.unwrap();

        assert!(logs.contains(&format!("Executing: cp {}", src.display())));
        assert!(!logs.contains("--recursive"));
        assert!(!tmp.path().join("out.txt").exists());
    }

    #[test]
    fn test_find_and_replace() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "linux-x86_64", false);
        let dir = tmp.path().join("tree");
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("a.pc"), "prefix=/usr/local\n").unwrap();
        fs::write(dir.join("sub/b.pc"), "libdir=/usr/local/lib\n").unwrap();
        fs::write(dir.join("c.txt"), "prefix=/usr/local\n").unwrap();

        find_and_replace(&config, &dir, "*.pc", "/usr/local", "/android/arm64-v8a").unwrap();

        assert_eq!(
            fs::read_to_string(dir.join("a.pc")).unwrap(),
            "prefix=/android/arm64-v8a\n"
        );
        assert_eq!(
            fs::read_to_string(dir.join("sub/b.pc")).unwrap(),
            "libdir=/android/arm64-v8a/lib\n"
        );
        assert_eq!(
            fs::read_to_string(dir.join("c.txt")).unwrap(),
            "prefix=/usr/local\n"
        );
    }

    #[test]
    fn test_create_package_dry_run() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "linux-x86_64", true);

        let (result, logs) = capture_logs(|| create_package(&config, Some(Path::new("usr"))));
        result.unwrap();

        assert!(logs.contains(&format!(
            "Executing: tar --create --file={} --gzip --directory={} .",
            config.pkg_file().display(),
            config.install_dir().join("usr").display()
        )));
        assert!(!config.pkg_file().exists());
    }
}
